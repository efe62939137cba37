//! Column descriptor types shared by table mode and query mode.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One output column, either from a catalog table or from an ad-hoc query.
///
/// `name` is not guaranteed to be unique within a result: a query may project
/// same-named columns from different tables. Do not key maps on it without
/// de-duplicating first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Catalog column name, or the query's output label.
    pub name: String,
    /// Dialect-native type name. Not comparable across dialects.
    pub declared_type: String,
    pub is_nullable: bool,
    /// Always false for columns derived from an ad-hoc query.
    pub is_primary_key: bool,
    /// Documentation comment, possibly empty.
    #[serde(default)]
    pub comment: String,
    /// 1-based position in the output.
    pub ordinal_position: u32,
}

impl ColumnDescriptor {
    /// Returns true if the column carries a non-blank comment.
    pub fn has_comment(&self) -> bool {
        !self.comment.trim().is_empty()
    }
}

/// A result-set column as reported by the driver for a described query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeColumn {
    /// Output label: the alias if present, else the source column name.
    pub label: String,
    /// Source column name, when the driver exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Driver-reported type name.
    pub type_name: String,
    /// `None` when the driver cannot tell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

impl ShapeColumn {
    pub fn new(label: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            origin: None,
            type_name: type_name.into(),
            nullable: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// The name used for direct comment lookup: the origin if known, else the label.
    pub fn lookup_name(&self) -> &str {
        self.origin.as_deref().unwrap_or(&self.label)
    }
}
