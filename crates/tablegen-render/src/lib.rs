//! Table scaffold rendering for TableGen.
//!
//! Renders an ordered list of [`ColumnDescriptor`]s into the source of a
//! table: plain HTML, a Thymeleaf binding or a Mustache binding. The output
//! is template text meant to be pasted into a project, not a rendered page.

mod error;
mod html;
mod mustache;
mod naming;
mod thymeleaf;

pub use error::RenderError;
pub use naming::{escape_html, humanize, is_money_column, output_file_name, MONEY_KEYWORDS};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tablegen_core::ColumnDescriptor;

/// Supported scaffold flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Static markup with placeholder cells.
    #[default]
    Html,
    /// Thymeleaf `th:each` / `th:text` binding.
    Thymeleaf,
    /// Mustache `{{#rows}}` section.
    Mustache,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Thymeleaf => "thymeleaf",
            Self::Mustache => "mustache",
        }
    }

    /// File extension for generated output.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Html | Self::Thymeleaf => "html",
            Self::Mustache => "mustache",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = RenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "thymeleaf" => Ok(Self::Thymeleaf),
            "mustache" => Ok(Self::Mustache),
            _ => Err(RenderError::UnknownTemplate(value.to_string())),
        }
    }
}

/// Render `columns` as a table scaffold.
pub fn render(kind: TemplateKind, columns: &[ColumnDescriptor]) -> String {
    match kind {
        TemplateKind::Html => html::render(columns),
        TemplateKind::Thymeleaf => thymeleaf::render(columns),
        TemplateKind::Mustache => mustache::render(columns),
    }
}

/// Header text of a column: its comment, or its humanized name.
pub fn header_text(column: &ColumnDescriptor) -> String {
    if column.has_comment() {
        column.comment.clone()
    } else {
        humanize(&column.name)
    }
}

/// Write the shared `<table>` opening and `<thead>` block.
pub(crate) fn write_head(out: &mut String, columns: &[ColumnDescriptor]) {
    out.push_str("<table>\n");
    out.push_str("  <thead>\n");
    out.push_str("    <tr>\n");
    for column in columns {
        out.push_str(&format!("      <th>{}</th>\n", escape_html(&header_text(column))));
    }
    out.push_str("    </tr>\n");
    out.push_str("  </thead>\n");
}
