//! Scripted in-memory connection for unit tests.

use crate::connection::{CatalogConnection, CatalogRow};
use crate::error::IntrospectError;
use crate::types::ShapeColumn;

struct QueryRule {
    fragment: String,
    params: Option<Vec<String>>,
    response: Result<Vec<CatalogRow>, IntrospectError>,
}

struct DescribeRule {
    fragment: String,
    response: Result<Vec<ShapeColumn>, IntrospectError>,
}

/// A connection that answers queries from scripted rules.
///
/// Queries match the first rule whose SQL fragment is contained in the
/// statement (and whose parameters match, when given). Unmatched catalog
/// queries return no rows, like a catalog lookup of a missing table.
pub struct FakeConnection {
    product: String,
    queries: Vec<QueryRule>,
    describes: Vec<DescribeRule>,
    /// Every executed statement with its parameters, in order.
    pub executed: Vec<(String, Vec<String>)>,
}

impl FakeConnection {
    pub fn new(product: &str) -> Self {
        Self {
            product: product.to_string(),
            queries: Vec::new(),
            describes: Vec::new(),
            executed: Vec::new(),
        }
    }

    pub fn on_query(mut self, fragment: &str, rows: Vec<Vec<Option<&str>>>) -> Self {
        self.queries.push(QueryRule {
            fragment: fragment.to_string(),
            params: None,
            response: Ok(to_rows(rows)),
        });
        self
    }

    pub fn on_query_with(
        mut self,
        fragment: &str,
        params: &[&str],
        rows: Vec<Vec<Option<&str>>>,
    ) -> Self {
        self.queries.push(QueryRule {
            fragment: fragment.to_string(),
            params: Some(params.iter().map(|p| p.to_string()).collect()),
            response: Ok(to_rows(rows)),
        });
        self
    }

    pub fn fail_query(mut self, fragment: &str, error: IntrospectError) -> Self {
        self.queries.push(QueryRule {
            fragment: fragment.to_string(),
            params: None,
            response: Err(error),
        });
        self
    }

    pub fn on_describe(mut self, fragment: &str, shape: Vec<ShapeColumn>) -> Self {
        self.describes.push(DescribeRule {
            fragment: fragment.to_string(),
            response: Ok(shape),
        });
        self
    }

    pub fn fail_describe(mut self, fragment: &str, error: IntrospectError) -> Self {
        self.describes.push(DescribeRule {
            fragment: fragment.to_string(),
            response: Err(error),
        });
        self
    }
}

fn to_rows(rows: Vec<Vec<Option<&str>>>) -> Vec<CatalogRow> {
    rows.into_iter().map(|cells| cells.into_iter().collect()).collect()
}

impl CatalogConnection for FakeConnection {
    fn product_name(&self) -> &str {
        &self.product
    }

    fn query_rows(
        &mut self,
        sql: &str,
        params: &[&str],
    ) -> Result<Vec<CatalogRow>, IntrospectError> {
        self.executed
            .push((sql.to_string(), params.iter().map(|p| p.to_string()).collect()));

        let rule = self.queries.iter().find(|rule| {
            let params_match = rule.params.as_ref().is_none_or(|expected| {
                expected.iter().map(String::as_str).eq(params.iter().copied())
            });
            sql.contains(&rule.fragment) && params_match
        });

        match rule {
            Some(rule) => rule.response.clone(),
            None => Ok(Vec::new()),
        }
    }

    fn describe(&mut self, sql: &str) -> Result<Vec<ShapeColumn>, IntrospectError> {
        self.executed.push((sql.to_string(), Vec::new()));

        match self.describes.iter().find(|rule| sql.contains(&rule.fragment)) {
            Some(rule) => rule.response.clone(),
            None => Err(IntrospectError::query(format!("no such relation in: {sql}"))),
        }
    }
}
