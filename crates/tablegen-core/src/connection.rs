//! Connection abstraction used by the introspection engine.

use crate::error::IntrospectError;
use crate::types::ShapeColumn;

/// A positional row of nullable text cells returned by a catalog query.
///
/// Drivers convert whatever they receive (text, integers, booleans) to text
/// so the engine can read every dialect's catalog through one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow {
    cells: Vec<Option<String>>,
}

impl CatalogRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Returns the cell at `index`, or `None` when it is SQL NULL or missing.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|cell| cell.as_deref())
    }

    /// Returns the cell at `index`, treating NULL and missing cells as empty.
    pub fn text(&self, index: usize) -> &str {
        self.get(index).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: Into<String>> FromIterator<Option<S>> for CatalogRow {
    fn from_iter<I: IntoIterator<Item = Option<S>>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|cell| cell.map(Into::into)).collect(),
        }
    }
}

/// An open, live database connection as seen by the introspection engine.
///
/// Implementations connect to a database and run the catalog and shape
/// queries the engine builds for the detected dialect. Calls are blocking
/// and sequential; the connection is released when the value is dropped.
pub trait CatalogConnection {
    /// The product name the database reports for itself (e.g. `"MySQL"`).
    fn product_name(&self) -> &str;

    /// Run a read-only catalog query with positional text parameters.
    ///
    /// `sql` already contains the dialect's placeholder syntax for `params`.
    fn query_rows(
        &mut self,
        sql: &str,
        params: &[&str],
    ) -> Result<Vec<CatalogRow>, IntrospectError>;

    /// Describe the result set `sql` would produce, without fetching rows.
    fn describe(&mut self, sql: &str) -> Result<Vec<ShapeColumn>, IntrospectError>;
}

impl<C: CatalogConnection + ?Sized> CatalogConnection for &mut C {
    fn product_name(&self) -> &str {
        (**self).product_name()
    }

    fn query_rows(
        &mut self,
        sql: &str,
        params: &[&str],
    ) -> Result<Vec<CatalogRow>, IntrospectError> {
        (**self).query_rows(sql, params)
    }

    fn describe(&mut self, sql: &str) -> Result<Vec<ShapeColumn>, IntrospectError> {
        (**self).describe(sql)
    }
}

impl<C: CatalogConnection + ?Sized> CatalogConnection for Box<C> {
    fn product_name(&self) -> &str {
        (**self).product_name()
    }

    fn query_rows(
        &mut self,
        sql: &str,
        params: &[&str],
    ) -> Result<Vec<CatalogRow>, IntrospectError> {
        (**self).query_rows(sql, params)
    }

    fn describe(&mut self, sql: &str) -> Result<Vec<ShapeColumn>, IntrospectError> {
        (**self).describe(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_accessors() {
        let row: CatalogRow = vec![Some("id"), None].into_iter().collect();
        assert_eq!(row.get(0), Some("id"));
        assert_eq!(row.get(1), None);
        assert_eq!(row.text(1), "");
        assert_eq!(row.text(7), "");
        assert_eq!(row.len(), 2);
    }
}
