//! Connection-bound entry point for table mode and query mode.

use std::collections::HashMap;

use crate::catalog;
use crate::connection::CatalogConnection;
use crate::dialect::{self, DialectProfile};
use crate::error::IntrospectError;
use crate::provenance;
use crate::shape;
use crate::types::ColumnDescriptor;

/// Introspects tables and queries over one connection.
///
/// The dialect profile is detected once, when the introspector is created.
/// Every call is independent: nothing is cached between calls.
pub struct Introspector<C> {
    connection: C,
    profile: DialectProfile,
}

impl<C: CatalogConnection> Introspector<C> {
    /// Bind `connection`, detecting its dialect from the reported product name.
    pub fn new(connection: C) -> Self {
        let profile = dialect::detect(&connection);
        Self { connection, profile }
    }

    /// Bind `connection` with an explicitly chosen profile.
    pub fn with_profile(connection: C, profile: DialectProfile) -> Self {
        Self { connection, profile }
    }

    pub fn profile(&self) -> DialectProfile {
        self.profile
    }

    /// Release the introspector and hand the connection back.
    pub fn into_inner(self) -> C {
        self.connection
    }

    /// Columns of a catalog table; see [`catalog::read_columns`].
    pub fn table_columns(
        &mut self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnDescriptor>, IntrospectError> {
        catalog::read_columns(&mut self.connection, self.profile, schema, table)
    }

    /// Columns of an ad-hoc query with heuristically recovered comments.
    ///
    /// Only failures to describe the query are errors; comment recovery is
    /// best-effort.
    pub fn query_columns(
        &mut self,
        query: &str,
        default_schema: Option<&str>,
    ) -> Result<Vec<ColumnDescriptor>, IntrospectError> {
        let shape = shape::read_shape(&mut self.connection, self.profile, query)?;
        Ok(provenance::attach_comments(
            &mut self.connection,
            self.profile,
            query,
            default_schema,
            shape,
        ))
    }

    /// Unambiguous column comments of a whole schema; see
    /// [`provenance::unique_schema_comments`].
    pub fn unique_schema_comments(
        &mut self,
        schema: &str,
    ) -> Result<HashMap<String, String>, IntrospectError> {
        provenance::unique_schema_comments(&mut self.connection, self.profile, schema)
    }
}
