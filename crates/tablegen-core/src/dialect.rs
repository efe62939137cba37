//! Dialect profiles and dialect detection.
//!
//! Each supported database family is one [`DialectProfile`] variant that
//! bundles everything dialect-specific the engine needs: the catalog column
//! query, the key and nullability decoding rules, the comment queries used by
//! provenance resolution, and the bind placeholder syntax. Supporting a new
//! engine means adding a variant here.

use crate::connection::CatalogConnection;
#[cfg(feature = "tracing")]
use tracing::debug;

/// `(source, column name, comment, schema column, table column)`.
type CommentSource = (&'static str, &'static str, &'static str, &'static str, &'static str);

/// Catalog conventions of one database family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialectProfile {
    /// MySQL and MariaDB: `information_schema.COLUMNS` with `COLUMN_TYPE`,
    /// `COLUMN_KEY` and `COLUMN_COMMENT`. Also the fallback for unknown products.
    #[default]
    MySql,
    /// PostgreSQL: `information_schema.columns`, comments from `col_description`.
    Postgres,
    /// Oracle: `ALL_TAB_COLUMNS` joined to `ALL_COL_COMMENTS`.
    Oracle,
}

/// Classify a connection by the product name it reports.
///
/// Never fails: unknown products get the MySQL profile, which may produce
/// wrong results for engines with an incompatible catalog.
pub fn detect<C: CatalogConnection + ?Sized>(connection: &C) -> DialectProfile {
    DialectProfile::from_product_name(connection.product_name())
}

impl DialectProfile {
    /// Case-insensitive substring match on a reported product name.
    pub fn from_product_name(product: &str) -> Self {
        let product = product.to_lowercase();
        let profile = if product.contains("oracle") {
            Self::Oracle
        } else if product.contains("postgresql") {
            Self::Postgres
        } else {
            Self::MySql
        };

        #[cfg(feature = "tracing")]
        debug!(product = %product, profile = profile.name(), "detected dialect");

        profile
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgresql",
            Self::Oracle => "oracle",
        }
    }

    /// Bind placeholder for the 1-based parameter `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::MySql => "?".to_string(),
            Self::Postgres => format!("${index}"),
            Self::Oracle => format!(":{index}"),
        }
    }

    /// Catalog query returning one row per column of `(schema, table)`.
    ///
    /// Cells, in order: name, type, nullable flag, key flag, comment,
    /// ordinal position. Parameters: schema, table.
    pub fn columns_sql(&self) -> &'static str {
        match self {
            Self::MySql => {
                r#"
                SELECT COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_KEY, COLUMN_COMMENT,
                       ORDINAL_POSITION
                FROM information_schema.COLUMNS
                WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
                ORDER BY ORDINAL_POSITION
            "#
            }
            Self::Postgres => {
                r#"
                SELECT
                    c.column_name::text,
                    c.udt_name::text,
                    c.is_nullable::text,
                    ''::text,
                    COALESCE(pg_catalog.col_description(
                        format('%I.%I', c.table_schema, c.table_name)::regclass::oid,
                        c.ordinal_position::int
                    ), '')::text,
                    c.ordinal_position::int4
                FROM information_schema.columns c
                WHERE c.table_schema = $1 AND c.table_name = $2
                ORDER BY c.ordinal_position
            "#
            }
            Self::Oracle => {
                r#"
                SELECT
                    t.COLUMN_NAME,
                    t.DATA_TYPE,
                    t.NULLABLE,
                    '',
                    c.COMMENTS,
                    t.COLUMN_ID
                FROM ALL_TAB_COLUMNS t
                LEFT JOIN ALL_COL_COMMENTS c
                    ON t.OWNER = c.OWNER
                    AND t.TABLE_NAME = c.TABLE_NAME
                    AND t.COLUMN_NAME = c.COLUMN_NAME
                WHERE t.OWNER = :1 AND t.TABLE_NAME = :2
                ORDER BY t.COLUMN_ID
            "#
            }
        }
    }

    /// Decode the catalog's nullability cell.
    pub fn decode_nullable(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::MySql | Self::Postgres => value.eq_ignore_ascii_case("YES"),
            Self::Oracle => value.eq_ignore_ascii_case("Y"),
        }
    }

    /// Decode the catalog's key cell. Only MySQL exposes key-ness here.
    pub fn decode_primary_key(&self, value: Option<&str>) -> bool {
        match self {
            Self::MySql => value.is_some_and(|key| key.trim().eq_ignore_ascii_case("PRI")),
            Self::Postgres | Self::Oracle => false,
        }
    }

    /// Expression evaluating to the session's current schema.
    pub fn current_schema_expr(&self) -> &'static str {
        match self {
            Self::MySql => "DATABASE()",
            Self::Postgres => "current_schema()",
            Self::Oracle => "SYS_CONTEXT('USERENV', 'CURRENT_SCHEMA')",
        }
    }

    /// Wrap `query` so the database can describe it without scanning rows.
    ///
    /// The subquery is closed on its own line so a trailing `--` comment in
    /// `query` cannot swallow the wrapper.
    pub fn shape_sql(&self, query: &str) -> String {
        match self {
            // Oracle rejects AS before a table alias.
            Self::Oracle => format!("SELECT * FROM ({query}\n) t WHERE 1=0"),
            Self::MySql | Self::Postgres => format!("SELECT * FROM ({query}\n) AS t WHERE 1=0"),
        }
    }

    /// `(source, column name, comment, schema column, table column)` of the
    /// relation that maps columns to comments.
    fn comment_source(&self) -> CommentSource {
        match self {
            Self::MySql => (
                "information_schema.COLUMNS",
                "COLUMN_NAME",
                "COLUMN_COMMENT",
                "TABLE_SCHEMA",
                "TABLE_NAME",
            ),
            Self::Postgres => (
                "information_schema.columns c",
                "c.column_name::text",
                concat!(
                    "pg_catalog.col_description(",
                    "format('%I.%I', c.table_schema, c.table_name)::regclass::oid, ",
                    "c.ordinal_position::int)::text",
                ),
                "c.table_schema",
                "c.table_name",
            ),
            Self::Oracle => (
                "ALL_COL_COMMENTS",
                "COLUMN_NAME",
                "COMMENTS",
                "OWNER",
                "TABLE_NAME",
            ),
        }
    }

    /// Batch comment query for several `(schema, table)` pairs.
    ///
    /// A `None` schema is matched against [`Self::current_schema_expr`].
    /// Returns the SQL and its parameters; cells are `(column name, comment)`.
    pub fn table_comments_sql<'a>(
        &self,
        tables: &[(Option<&'a str>, &'a str)],
    ) -> (String, Vec<&'a str>) {
        let (source, name_col, comment_col, schema_col, table_col) = self.comment_source();
        let mut params = Vec::with_capacity(tables.len() * 2);
        let mut conditions = Vec::with_capacity(tables.len());

        for (schema, table) in tables {
            let schema_match = match schema {
                Some(schema) => {
                    params.push(*schema);
                    self.placeholder(params.len())
                }
                None => self.current_schema_expr().to_string(),
            };
            params.push(*table);
            let table_match = self.placeholder(params.len());
            conditions.push(format!(
                "({schema_col} = {schema_match} AND {table_col} = {table_match})"
            ));
        }

        let sql = format!(
            "SELECT {name_col}, {comment_col} FROM {source} WHERE {}",
            conditions.join(" OR ")
        );
        (sql, params)
    }

    /// Comment query for every column of one schema; the parameter is the schema.
    ///
    /// Cells: `(column name, comment, table name)`.
    pub fn schema_comments_sql(&self) -> String {
        let (source, name_col, comment_col, schema_col, table_col) = self.comment_source();
        format!(
            "SELECT {name_col}, {comment_col}, {table_col} FROM {source} WHERE {schema_col} = {}",
            self.placeholder(1)
        )
    }

    /// The sqlparser dialect used by the read-only query guard.
    pub fn to_sqlparser_dialect(&self) -> Box<dyn sqlparser::dialect::Dialect> {
        use sqlparser::dialect::{GenericDialect, MySqlDialect, PostgreSqlDialect};
        match self {
            Self::MySql => Box::new(MySqlDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Oracle => Box::new(GenericDialect {}),
        }
    }
}

impl std::fmt::Display for DialectProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeConnection;
    use rstest::rstest;

    #[rstest]
    #[case("Oracle", DialectProfile::Oracle)]
    #[case("Oracle Database 19c Enterprise Edition", DialectProfile::Oracle)]
    #[case("PostgreSQL", DialectProfile::Postgres)]
    #[case("postgresql 16.2", DialectProfile::Postgres)]
    #[case("MySQL", DialectProfile::MySql)]
    #[case("MariaDB", DialectProfile::MySql)]
    #[case("SQLite", DialectProfile::MySql)]
    #[case("", DialectProfile::MySql)]
    fn test_detect_from_product_name(#[case] product: &str, #[case] expected: DialectProfile) {
        let connection = FakeConnection::new(product);
        assert_eq!(detect(&connection), expected);
    }

    #[rstest]
    #[case(DialectProfile::MySql, "YES", true)]
    #[case(DialectProfile::MySql, "NO", false)]
    #[case(DialectProfile::Postgres, "YES", true)]
    #[case(DialectProfile::Postgres, "NO", false)]
    #[case(DialectProfile::Oracle, "Y", true)]
    #[case(DialectProfile::Oracle, "N", false)]
    #[case(DialectProfile::Oracle, "y", true)]
    fn test_decode_nullable(
        #[case] profile: DialectProfile,
        #[case] raw: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(profile.decode_nullable(raw), expected);
    }

    #[test]
    fn test_only_mysql_exposes_primary_key() {
        assert!(DialectProfile::MySql.decode_primary_key(Some("PRI")));
        assert!(!DialectProfile::MySql.decode_primary_key(Some("MUL")));
        assert!(!DialectProfile::MySql.decode_primary_key(None));
        assert!(!DialectProfile::Postgres.decode_primary_key(Some("PRI")));
        assert!(!DialectProfile::Oracle.decode_primary_key(Some("PRI")));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(DialectProfile::MySql.placeholder(2), "?");
        assert_eq!(DialectProfile::Postgres.placeholder(2), "$2");
        assert_eq!(DialectProfile::Oracle.placeholder(2), ":2");
    }

    #[test]
    fn test_shape_sql_wraps_query() {
        assert_eq!(
            DialectProfile::MySql.shape_sql("SELECT 1"),
            "SELECT * FROM (SELECT 1\n) AS t WHERE 1=0"
        );
        assert_eq!(
            DialectProfile::Oracle.shape_sql("SELECT 1 FROM dual"),
            "SELECT * FROM (SELECT 1 FROM dual\n) t WHERE 1=0"
        );
    }

    #[test]
    fn test_table_comments_sql_numbers_postgres_params() {
        let (sql, params) = DialectProfile::Postgres
            .table_comments_sql(&[(Some("shop"), "orders"), (None, "users")]);

        assert!(sql.contains("(c.table_schema = $1 AND c.table_name = $2)"));
        assert!(sql.contains("(c.table_schema = current_schema() AND c.table_name = $3)"));
        assert_eq!(params, vec!["shop", "orders", "users"]);
    }

    #[test]
    fn test_table_comments_sql_mysql() {
        let tables = [(Some("shop"), "orders"), (Some("shop"), "items")];
        let (sql, params) = DialectProfile::MySql.table_comments_sql(&tables);

        assert_eq!(
            sql,
            "SELECT COLUMN_NAME, COLUMN_COMMENT FROM information_schema.COLUMNS WHERE \
             (TABLE_SCHEMA = ? AND TABLE_NAME = ?) OR (TABLE_SCHEMA = ? AND TABLE_NAME = ?)"
        );
        assert_eq!(params, vec!["shop", "orders", "shop", "items"]);
    }

    #[test]
    fn test_schema_comments_sql_oracle() {
        assert_eq!(
            DialectProfile::Oracle.schema_comments_sql(),
            "SELECT COLUMN_NAME, COMMENTS, TABLE_NAME FROM ALL_COL_COMMENTS WHERE OWNER = :1"
        );
    }
}
