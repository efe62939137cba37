//! One-shot generation: connect, introspect, filter, render.
//!
//! Shared by the command line and the `/api/generate` endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tablegen_core::{
    split_qualified, CatalogConnection, ColumnDescriptor, ColumnFilter, IntrospectError,
    Introspector,
};
use tablegen_render::TemplateKind;
use thiserror::Error;

use crate::metadata::SqlxConnection;

/// Table name reported for query-mode results.
pub const QUERY_RESULT_NAME: &str = "custom_query_result";

/// Everything needed to produce one scaffold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub db_url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Schema of `table`, and the default schema for unqualified tables in `sql_query`.
    pub schema: Option<String>,
    pub table: Option<String>,
    /// When non-blank, takes precedence over `table`.
    pub sql_query: Option<String>,
    pub template_type: TemplateKind,
    pub exclude: Vec<String>,
    /// When non-empty, `exclude` is ignored.
    pub only: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub table_name: String,
    pub generated_code: String,
    pub column_count: usize,
    pub columns: Vec<ColumnDescriptor>,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No columns found for {0}")]
    NoColumns(String),

    #[error(transparent)]
    Introspect(#[from] IntrospectError),
}

/// What a request asks to introspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target<'a> {
    Table { schema: &'a str, table: &'a str },
    Query { sql: &'a str, default_schema: Option<&'a str> },
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl GenerateRequest {
    /// Check required fields without touching the database.
    pub fn validate(&self) -> Result<(), GenerateError> {
        self.db_url()?;
        self.target().map(|_| ())
    }

    fn db_url(&self) -> Result<&str, GenerateError> {
        non_blank(&self.db_url)
            .ok_or_else(|| GenerateError::InvalidRequest("dbUrl is required".to_string()))
    }

    fn target(&self) -> Result<Target<'_>, GenerateError> {
        let schema = non_blank(&self.schema);
        if let Some(sql) = non_blank(&self.sql_query) {
            return Ok(Target::Query {
                sql,
                default_schema: schema,
            });
        }

        let table = non_blank(&self.table).ok_or_else(|| {
            GenerateError::InvalidRequest("table is required unless sqlQuery is given".to_string())
        })?;
        let (schema, table) = split_qualified(schema.unwrap_or_default(), table);
        if schema.is_empty() {
            return Err(GenerateError::InvalidRequest(format!(
                "schema is required for unqualified table '{table}'"
            )));
        }
        Ok(Target::Table { schema, table })
    }

    /// Name the output is reported under: the table as given, also in query
    /// mode, else [`QUERY_RESULT_NAME`].
    pub fn table_name(&self) -> String {
        non_blank(&self.table).unwrap_or(QUERY_RESULT_NAME).to_string()
    }

    fn filter(&self) -> ColumnFilter {
        ColumnFilter::new(clean(&self.only), clean(&self.exclude))
    }
}

fn clean(names: &[String]) -> impl Iterator<Item = &str> {
    names.iter().map(|n| n.trim()).filter(|n| !n.is_empty())
}

/// Generate a scaffold against the live database named in `request`.
pub fn generate(request: &GenerateRequest) -> Result<GenerateResponse, GenerateError> {
    request.validate()?;
    let mut connection = connect(request)?;
    let result = generate_with(&mut connection, request);
    if let Err(e) = connection.close() {
        tracing::warn!(error = %e, "failed to close connection");
    }
    result
}

/// Generate a scaffold over an already open connection.
pub fn generate_with<C: CatalogConnection>(
    connection: C,
    request: &GenerateRequest,
) -> Result<GenerateResponse, GenerateError> {
    let target = request.target()?;
    let mut introspector = Introspector::new(connection);
    tracing::debug!(profile = %introspector.profile(), ?target, "introspecting");

    let columns = match target {
        Target::Table { schema, table } => introspector.table_columns(schema, table)?,
        Target::Query { sql, default_schema } => introspector
            .query_columns(sql, default_schema)?
            .into_iter()
            .map(|mut column| {
                if !column.has_comment() {
                    column.comment = column.name.clone();
                }
                column
            })
            .collect(),
    };

    let table_name = request.table_name();
    if columns.is_empty() {
        return Err(GenerateError::NoColumns(table_name));
    }

    let columns = request.filter().apply(columns);
    let generated_code = tablegen_render::render(request.template_type, &columns);

    Ok(GenerateResponse {
        table_name,
        generated_code,
        column_count: columns.len(),
        columns,
    })
}

/// Unambiguous column comments for the whole of `request.schema`.
pub fn schema_comments(
    request: &GenerateRequest,
) -> Result<BTreeMap<String, String>, GenerateError> {
    let schema = non_blank(&request.schema)
        .ok_or_else(|| GenerateError::InvalidRequest("schema is required".to_string()))?;
    let mut connection = connect(request)?;
    let comments = Introspector::new(&mut connection).unique_schema_comments(schema);
    if let Err(e) = connection.close() {
        tracing::warn!(error = %e, "failed to close connection");
    }
    Ok(comments?.into_iter().collect())
}

fn connect(request: &GenerateRequest) -> Result<SqlxConnection, GenerateError> {
    let url = request.db_url()?;
    Ok(SqlxConnection::connect(
        url,
        non_blank(&request.user),
        request.password.as_deref(),
    )?)
}
