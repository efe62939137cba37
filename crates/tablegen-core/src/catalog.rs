//! Catalog column reader for table mode.

use crate::connection::{CatalogConnection, CatalogRow};
use crate::dialect::DialectProfile;
use crate::error::IntrospectError;
use crate::types::ColumnDescriptor;
#[cfg(feature = "tracing")]
use tracing::debug;

/// Split a `schema.table` reference, falling back to `schema` for plain names.
///
/// Only a reference with exactly one `.` is split; anything else is taken as
/// a table name verbatim.
pub fn split_qualified<'a>(schema: &'a str, table: &'a str) -> (&'a str, &'a str) {
    let mut parts = table.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(qualifier), Some(name), None) => (qualifier, name),
        _ => (schema, table),
    }
}

/// Read the columns of `schema.table` from the catalog, in declaration order.
///
/// A `table` of the form `schema.table` overrides `schema`. A table with no
/// catalog rows, including one that does not exist, yields an empty list.
///
/// # Errors
/// Returns [`IntrospectError::Query`] when the catalog query is rejected.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(connection, profile), fields(profile = %profile))
)]
pub fn read_columns<C: CatalogConnection + ?Sized>(
    connection: &mut C,
    profile: DialectProfile,
    schema: &str,
    table: &str,
) -> Result<Vec<ColumnDescriptor>, IntrospectError> {
    let (schema, table) = split_qualified(schema, table);
    let rows = connection.query_rows(profile.columns_sql(), &[schema, table])?;

    #[cfg(feature = "tracing")]
    debug!(schema, table, rows = rows.len(), "read catalog columns");

    rows.iter().map(|row| row_to_descriptor(profile, row)).collect()
}

fn row_to_descriptor(
    profile: DialectProfile,
    row: &CatalogRow,
) -> Result<ColumnDescriptor, IntrospectError> {
    let ordinal = row.text(5).trim();
    let ordinal_position = ordinal.parse::<u32>().map_err(|_| {
        IntrospectError::query(format!(
            "catalog returned invalid ordinal position '{ordinal}' for column '{}'",
            row.text(0)
        ))
    })?;

    Ok(ColumnDescriptor {
        name: row.text(0).to_string(),
        declared_type: row.text(1).to_string(),
        is_nullable: profile.decode_nullable(row.text(2)),
        is_primary_key: profile.decode_primary_key(row.get(3)),
        comment: row.text(4).to_string(),
        ordinal_position,
    })
}
