//! Heuristic comment recovery for ad-hoc queries.
//!
//! A query's result set does not carry catalog comments. This module recovers
//! them on a best-effort basis:
//!
//! 1. Scan the query text for `FROM <ref>` and `JOIN <ref>` table references.
//! 2. Fetch `(column, comment)` pairs for all referenced tables in one query.
//! 3. Match each output column directly by name, or through a
//!    `<source> [AS] <alias>` rewrite found in the query text.
//!
//! The scanner is lexical, not a SQL parser: subqueries used as table
//! references, CTE names and quoted identifiers are not understood and may be
//! over- or under-collected. Nothing here ever fails the introspection.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::connection::CatalogConnection;
use crate::dialect::DialectProfile;
use crate::error::IntrospectError;
use crate::types::{ColumnDescriptor, ShapeColumn};
#[cfg(feature = "tracing")]
use tracing::debug;

/// A table referenced by a query, as written in the query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub schema: Option<String>,
    pub table: String,
}

impl TableRef {
    /// Split a `schema.table` or `table` token.
    pub fn parse(token: &str) -> Self {
        match token.split_once('.') {
            Some((schema, table)) => Self {
                schema: Some(schema.to_string()),
                table: table.to_string(),
            },
            None => Self {
                schema: None,
                table: token.to_string(),
            },
        }
    }
}

/// Collect the distinct `FROM`/`JOIN` table references of `query`, in order
/// of first appearance.
pub fn referenced_tables(query: &str) -> Vec<TableRef> {
    static TABLE_REF: OnceLock<Regex> = OnceLock::new();
    let re = TABLE_REF.get_or_init(|| {
        Regex::new(r"(?i)\b(?:FROM|JOIN)\s+([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)?)")
            .expect("Invalid regex pattern")
    });

    let mut seen = HashSet::new();
    re.captures_iter(query)
        .filter_map(|caps| caps.get(1))
        .map(|token| token.as_str())
        .filter(|token| seen.insert(token.to_string()))
        .map(TableRef::parse)
        .collect()
}

/// Column-name to comment mapping built from catalog rows.
///
/// Inserting a name twice keeps the later comment. Lookups try the exact
/// name first and then an ASCII case-insensitive match; among names that
/// differ only in case, the one inserted last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentMap {
    comments: HashMap<String, String>,
    // lowercased name -> latest name inserted with that spelling
    lowercase: HashMap<String, String>,
}

impl CommentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a comment; blank comments are ignored.
    pub fn insert(&mut self, column: impl Into<String>, comment: impl Into<String>) {
        let comment = comment.into();
        if comment.trim().is_empty() {
            return;
        }
        let column = column.into();
        self.lowercase.insert(column.to_ascii_lowercase(), column.clone());
        self.comments.insert(column, comment);
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.comments
            .get(column)
            .or_else(|| {
                self.lowercase
                    .get(&column.to_ascii_lowercase())
                    .and_then(|name| self.comments.get(name))
            })
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

/// Fetch comments for every referenced table in one catalog query.
///
/// References without a schema use `default_schema`, or the session's current
/// schema when none is given.
pub fn fetch_comments<C: CatalogConnection + ?Sized>(
    connection: &mut C,
    profile: DialectProfile,
    tables: &[TableRef],
    default_schema: Option<&str>,
) -> Result<CommentMap, IntrospectError> {
    let mut comments = CommentMap::new();
    if tables.is_empty() {
        return Ok(comments);
    }

    let default_schema = default_schema.filter(|schema| !schema.trim().is_empty());
    let pairs: Vec<(Option<&str>, &str)> = tables
        .iter()
        .map(|table_ref| (table_ref.schema.as_deref().or(default_schema), table_ref.table.as_str()))
        .collect();

    let (sql, params) = profile.table_comments_sql(&pairs);
    for row in connection.query_rows(&sql, &params)? {
        if let Some(column) = row.get(0) {
            comments.insert(column, row.text(1));
        }
    }

    Ok(comments)
}

/// Find source column names that `label` aliases in `query`.
///
/// Matches `.source AS label`, `.source label`, `source AS label` and
/// `source label`, case-insensitively with a word boundary after the label.
/// Candidates are returned in order of appearance.
pub fn alias_sources(query: &str, label: &str) -> Vec<String> {
    let pattern = format!(
        r"(?:\.|\b)\s*([A-Za-z0-9_]+)\s+(?:AS\s+)?\b{}\b",
        regex::escape(label)
    );
    let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
        return Vec::new();
    };

    re.captures_iter(query)
        .filter_map(|caps| caps.get(1))
        .map(|source| source.as_str().to_string())
        .filter(|source| !source.eq_ignore_ascii_case(label))
        .collect()
}

/// Resolve the comment of one shaped column, or an empty string.
pub fn resolve_comment(comments: &CommentMap, query: &str, column: &ShapeColumn) -> String {
    if let Some(comment) = comments.get(column.lookup_name()) {
        return comment.to_string();
    }

    alias_sources(query, &column.label)
        .iter()
        .find_map(|source| comments.get(source))
        .unwrap_or_default()
        .to_string()
}

/// Turn a query shape into descriptors, attaching recovered comments.
///
/// Failures while fetching comments are swallowed: the columns are returned
/// with empty comments instead.
pub fn attach_comments<C: CatalogConnection + ?Sized>(
    connection: &mut C,
    profile: DialectProfile,
    query: &str,
    default_schema: Option<&str>,
    shape: Vec<ShapeColumn>,
) -> Vec<ColumnDescriptor> {
    let tables = referenced_tables(query);
    let comments = match fetch_comments(connection, profile, &tables, default_schema) {
        Ok(comments) => comments,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            debug!(error = %_err, "comment lookup failed, continuing without comments");
            CommentMap::new()
        }
    };

    #[cfg(feature = "tracing")]
    debug!(tables = tables.len(), comments = comments.len(), "resolved comment candidates");

    shape
        .into_iter()
        .enumerate()
        .map(|(index, column)| ColumnDescriptor {
            comment: resolve_comment(&comments, query, &column),
            name: column.label,
            declared_type: column.type_name,
            is_nullable: column.nullable.unwrap_or(false),
            is_primary_key: false,
            ordinal_position: (index + 1) as u32,
        })
        .collect()
}

/// Load every column comment of `schema`, dropping ambiguous names.
///
/// A column name that carries a comment in more than one table is excluded
/// entirely, even when the comments are identical. This is stricter than the
/// per-query lookup in [`attach_comments`], where the last table wins.
///
/// # Errors
/// Returns [`IntrospectError::Query`] when the catalog query is rejected.
pub fn unique_schema_comments<C: CatalogConnection + ?Sized>(
    connection: &mut C,
    profile: DialectProfile,
    schema: &str,
) -> Result<HashMap<String, String>, IntrospectError> {
    let rows = connection.query_rows(&profile.schema_comments_sql(), &[schema])?;

    let mut unique = HashMap::new();
    let mut ambiguous = HashSet::new();
    for row in &rows {
        let (Some(column), Some(comment)) = (row.get(0), row.get(1)) else {
            continue;
        };
        if comment.trim().is_empty() {
            continue;
        }
        if ambiguous.contains(column) {
            continue;
        }
        if unique.remove(column).is_some() {
            ambiguous.insert(column.to_string());
        } else {
            unique.insert(column.to_string(), comment.to_string());
        }
    }

    #[cfg(feature = "tracing")]
    debug!(schema, unique = unique.len(), ambiguous = ambiguous.len(), "loaded schema comments");

    Ok(unique)
}
