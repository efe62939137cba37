//! Database metadata introspection for TableGen.
//!
//! The engine turns a table reference or an ad-hoc query into an ordered
//! list of [`ColumnDescriptor`]s. It never reads row data: table mode asks
//! the catalog, query mode asks the driver for the result-set shape of a
//! zero-row wrapper and then recovers column comments heuristically.
//!
//! All database access goes through the [`CatalogConnection`] trait so the
//! engine stays independent of any particular driver.

pub mod catalog;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod filter;
pub mod introspect;
pub mod provenance;
pub mod shape;
pub mod types;

pub use catalog::{read_columns, split_qualified};
pub use connection::{CatalogConnection, CatalogRow};
pub use dialect::{detect, DialectProfile};
pub use error::IntrospectError;
pub use filter::{filter_columns, ColumnFilter};
pub use introspect::Introspector;
pub use provenance::{referenced_tables, unique_schema_comments, CommentMap, TableRef};
pub use shape::read_shape;
pub use types::{ColumnDescriptor, ShapeColumn};

// Test utilities (must be at end of file)
#[cfg(test)]
pub mod test_utils;
