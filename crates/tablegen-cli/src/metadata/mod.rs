//! Live database connections for introspection.
//!
//! The engine in `tablegen-core` only sees the `CatalogConnection` trait;
//! this module provides the driver-backed implementation the binary and
//! the server use.

mod sqlx_provider;

pub use sqlx_provider::{DatabaseType, SqlxConnection};
