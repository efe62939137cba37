//! Column inclusion/exclusion.

use std::collections::HashSet;

use crate::types::ColumnDescriptor;

/// Column-name policy applied after introspection.
///
/// A non-empty `include` list wins outright: only those columns are kept and
/// `exclude` is ignored. Otherwise every column not in `exclude` is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnFilter {
    pub include: HashSet<String>,
    pub exclude: HashSet<String>,
}

impl ColumnFilter {
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keeps(&self, name: &str) -> bool {
        if !self.include.is_empty() {
            return self.include.contains(name);
        }
        !self.exclude.contains(name)
    }

    /// Apply the policy, preserving column order.
    pub fn apply(&self, columns: Vec<ColumnDescriptor>) -> Vec<ColumnDescriptor> {
        columns.into_iter().filter(|column| self.keeps(&column.name)).collect()
    }
}

/// Filter `columns` by name; see [`ColumnFilter`].
pub fn filter_columns(
    columns: Vec<ColumnDescriptor>,
    include: &HashSet<String>,
    exclude: &HashSet<String>,
) -> Vec<ColumnDescriptor> {
    ColumnFilter {
        include: include.clone(),
        exclude: exclude.clone(),
    }
    .apply(columns)
}
