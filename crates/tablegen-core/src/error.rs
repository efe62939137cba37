//! Error types for metadata introspection.
//!
//! # Error Handling Strategy
//!
//! Only genuine I/O and SQL failures are surfaced as [`IntrospectError`]:
//!
//! - [`IntrospectError::Connection`]: the connection could not be established
//!   or used. Fatal, never retried.
//! - [`IntrospectError::Query`]: the database rejected a catalog or shape
//!   query (bad identifier, invalid SQL), or the query was refused before it
//!   reached the database.
//!
//! An empty column list is not an error; the caller decides whether "no
//! columns" means "table not found". Comment recovery for ad-hoc queries is
//! best-effort and degrades to an empty comment instead of failing.

use thiserror::Error;

/// Errors that can occur while introspecting a table or query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),
}

impl IntrospectError {
    /// Creates a query error from any displayable message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Creates a connection error from any displayable message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Returns true if the failure came from the connection rather than the SQL.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
