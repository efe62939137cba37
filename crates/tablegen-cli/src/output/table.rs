//! Human-readable table output formatting.

use std::fmt::Write;

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::generate::GenerateResponse;

#[derive(Tabled)]
struct ColumnRow<'a> {
    #[tabled(rename = "#")]
    position: u32,
    #[tabled(rename = "Column")]
    name: &'a str,
    #[tabled(rename = "Type")]
    declared_type: &'a str,
    #[tabled(rename = "Null")]
    nullable: &'static str,
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Comment")]
    comment: &'a str,
}

/// Format the introspected columns as a text table with an optional colored title.
pub fn format_table(response: &GenerateResponse, colored: bool) -> String {
    let mut out = String::new();

    let title = format!("{} ({} columns)", response.table_name, response.column_count);
    if colored {
        let _ = writeln!(out, "{}", title.bold());
    } else {
        let _ = writeln!(out, "{title}");
    }

    let rows = response.columns.iter().map(|column| ColumnRow {
        position: column.ordinal_position,
        name: &column.name,
        declared_type: &column.declared_type,
        nullable: if column.is_nullable { "YES" } else { "NO" },
        key: if column.is_primary_key { "PK" } else { "" },
        comment: &column.comment,
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    let _ = writeln!(out, "{table}");

    out
}
