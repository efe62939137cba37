//! SQLx-backed [`CatalogConnection`] for live databases.
//!
//! Supports PostgreSQL and MySQL/MariaDB. The engine is blocking, so every
//! call is driven to completion on a tokio runtime: the ambient one when we
//! are already inside a blocking task, or a private one otherwise.

use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::postgres::{PgColumn, PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, Connection, Database, Executor, MySql, Postgres, Row, TypeInfo};
use tablegen_core::{CatalogConnection, CatalogRow, IntrospectError, ShapeColumn};
use tokio::runtime::{Handle, Runtime};

/// Database type inferred from connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    Postgres,
    Mysql,
}

impl DatabaseType {
    /// Infer database type from a connection URL.
    ///
    /// A leading `jdbc:` is accepted so URLs copied from Java configuration
    /// work unchanged.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = strip_jdbc(url);
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Some(Self::Mysql)
        } else {
            None
        }
    }
}

fn strip_jdbc(url: &str) -> &str {
    url.strip_prefix("jdbc:").unwrap_or(url)
}

enum Backend {
    Postgres(PgConnection),
    Mysql(MySqlConnection),
}

enum Driver {
    Owned(Runtime),
    Ambient(Handle),
}

impl Driver {
    fn acquire() -> Result<Self, IntrospectError> {
        match Handle::try_current() {
            Ok(handle) => Ok(Self::Ambient(handle)),
            Err(_) => Runtime::new()
                .map(Self::Owned)
                .map_err(|e| IntrospectError::connection(format!("failed to start runtime: {e}"))),
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match self {
            Self::Owned(runtime) => runtime.block_on(future),
            Self::Ambient(handle) => handle.block_on(future),
        }
    }
}

/// A single live connection to PostgreSQL or MySQL.
pub struct SqlxConnection {
    // Declared before `driver` so the socket is dropped while the runtime lives.
    backend: Backend,
    driver: Driver,
}

impl SqlxConnection {
    /// Open a connection to `url`.
    ///
    /// `user` and `password` override credentials embedded in the URL.
    pub fn connect(
        url: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, IntrospectError> {
        let db_type = DatabaseType::from_url(url).ok_or_else(|| {
            IntrospectError::connection(format!("Unsupported database URL scheme: {url}"))
        })?;
        let url = strip_jdbc(url);
        let driver = Driver::acquire()?;

        let backend = match db_type {
            DatabaseType::Postgres => {
                let mut options = PgConnectOptions::from_str(url).map_err(classify)?;
                if let Some(user) = user.filter(|u| !u.is_empty()) {
                    options = options.username(user);
                }
                if let Some(password) = password {
                    options = options.password(password);
                }
                let conn = driver.block_on(PgConnection::connect_with(&options)).map_err(classify)?;
                Backend::Postgres(conn)
            }
            DatabaseType::Mysql => {
                let url = match url.strip_prefix("mariadb://") {
                    Some(rest) => format!("mysql://{rest}"),
                    None => url.to_string(),
                };
                let mut options = MySqlConnectOptions::from_str(&url).map_err(classify)?;
                if let Some(user) = user.filter(|u| !u.is_empty()) {
                    options = options.username(user);
                }
                if let Some(password) = password {
                    options = options.password(password);
                }
                let conn = driver
                    .block_on(MySqlConnection::connect_with(&options))
                    .map_err(classify)?;
                Backend::Mysql(conn)
            }
        };

        tracing::debug!(?db_type, "connected");
        Ok(Self { backend, driver })
    }

    /// Close the connection gracefully.
    pub fn close(self) -> Result<(), IntrospectError> {
        let Self { backend, driver } = self;
        let result = match backend {
            Backend::Postgres(conn) => driver.block_on(conn.close()),
            Backend::Mysql(conn) => driver.block_on(conn.close()),
        };
        result.map_err(classify)
    }
}

impl CatalogConnection for SqlxConnection {
    fn product_name(&self) -> &str {
        match self.backend {
            Backend::Postgres(_) => Postgres::NAME,
            Backend::Mysql(_) => MySql::NAME,
        }
    }

    fn query_rows(
        &mut self,
        sql: &str,
        params: &[&str],
    ) -> Result<Vec<CatalogRow>, IntrospectError> {
        match &mut self.backend {
            Backend::Postgres(conn) => {
                let mut query = sqlx::query::<Postgres>(sql);
                for param in params {
                    query = query.bind(*param);
                }
                let rows = self.driver.block_on(query.fetch_all(&mut *conn)).map_err(classify)?;
                Ok(rows.iter().map(pg_row).collect())
            }
            Backend::Mysql(conn) => {
                let mut query = sqlx::query::<MySql>(sql);
                for param in params {
                    query = query.bind(*param);
                }
                let rows = self.driver.block_on(query.fetch_all(&mut *conn)).map_err(classify)?;
                Ok(rows.iter().map(mysql_row).collect())
            }
        }
    }

    fn describe(&mut self, sql: &str) -> Result<Vec<ShapeColumn>, IntrospectError> {
        match &mut self.backend {
            Backend::Postgres(conn) => {
                let described = self.driver.block_on(conn.describe(sql)).map_err(classify)?;
                let shape: Vec<_> = described
                    .columns()
                    .iter()
                    .enumerate()
                    .map(|(i, column)| shape_column(column, described.nullable(i)))
                    .collect();
                let relations: Vec<_> =
                    described.columns().iter().map(relation_attribute).collect();

                let Some(lookup) = attribute_names_sql(&relations) else {
                    return Ok(shape);
                };
                match self.driver.block_on(sqlx::query::<Postgres>(&lookup).fetch_all(&mut *conn)) {
                    Ok(rows) => {
                        let rows: Vec<_> = rows.iter().map(pg_row).collect();
                        Ok(attach_origins(shape, &relations, &attribute_names(&rows)))
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "column origin lookup failed");
                        Ok(shape)
                    }
                }
            }
            Backend::Mysql(conn) => {
                let described = self.driver.block_on(conn.describe(sql)).map_err(classify)?;
                Ok(described
                    .columns()
                    .iter()
                    .enumerate()
                    .map(|(i, column)| shape_column(column, described.nullable(i)))
                    .collect())
            }
        }
    }
}

fn shape_column<C: Column>(column: &C, nullable: Option<bool>) -> ShapeColumn {
    let shape = ShapeColumn::new(column.name(), column.type_info().name());
    match nullable {
        Some(nullable) => shape.with_nullable(nullable),
        None => shape,
    }
}

/// A table column as the server identifies it: relation oid and attribute number.
type Attribute = (u32, i16);

fn relation_attribute(column: &PgColumn) -> Option<Attribute> {
    Some((column.relation_id()?.0, column.relation_attribute_no()?))
}

/// One catalog query naming every distinct table column in `relations`, or
/// `None` when no result column comes straight from a table.
fn attribute_names_sql(relations: &[Option<Attribute>]) -> Option<String> {
    let mut pairs: Vec<_> = relations.iter().flatten().copied().collect();
    pairs.sort_unstable();
    pairs.dedup();
    if pairs.is_empty() {
        return None;
    }

    let keys = pairs
        .iter()
        .map(|(relid, attnum)| format!("({relid}::oid, {attnum}::int2)"))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "SELECT a.attrelid::int8::text, a.attnum::text, a.attname::text \
         FROM pg_catalog.pg_attribute a WHERE (a.attrelid, a.attnum) IN ({keys})"
    ))
}

fn attribute_names(rows: &[CatalogRow]) -> HashMap<Attribute, String> {
    rows.iter()
        .filter_map(|row| {
            let key = (row.get(0)?.parse().ok()?, row.get(1)?.parse().ok()?);
            Some((key, row.get(2)?.to_string()))
        })
        .collect()
}

/// Record the underlying table column of each result column whose attribute
/// was resolved.
fn attach_origins(
    shape: Vec<ShapeColumn>,
    relations: &[Option<Attribute>],
    names: &HashMap<Attribute, String>,
) -> Vec<ShapeColumn> {
    shape
        .into_iter()
        .zip(relations.iter().chain(std::iter::repeat(&None)))
        .map(|(column, relation)| match relation.and_then(|key| names.get(&key)) {
            Some(origin) => column.with_origin(origin.as_str()),
            None => column,
        })
        .collect()
}

/// Decode every cell of a catalog row as text.
///
/// Catalog queries cast to text where the dialect allows it, but ordinal
/// columns come back as integers on some servers.
fn pg_row(row: &PgRow) -> CatalogRow {
    (0..row.len())
        .map(|i| {
            if let Ok(value) = row.try_get::<Option<String>, _>(i) {
                return value;
            }
            if let Ok(value) = row.try_get::<Option<i32>, _>(i) {
                return value.map(|v| v.to_string());
            }
            if let Ok(value) = row.try_get::<Option<i64>, _>(i) {
                return value.map(|v| v.to_string());
            }
            if let Ok(value) = row.try_get::<Option<bool>, _>(i) {
                return value.map(|v| v.to_string());
            }
            None
        })
        .collect()
}

fn mysql_row(row: &MySqlRow) -> CatalogRow {
    (0..row.len())
        .map(|i| {
            if let Ok(value) = row.try_get::<Option<String>, _>(i) {
                return value;
            }
            if let Ok(value) = row.try_get::<Option<u64>, _>(i) {
                return value.map(|v| v.to_string());
            }
            if let Ok(value) = row.try_get::<Option<i64>, _>(i) {
                return value.map(|v| v.to_string());
            }
            // information_schema text columns are reported as binary on some servers
            if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(i) {
                return value.map(|v| String::from_utf8_lossy(&v).into_owned());
            }
            None
        })
        .collect()
}

/// Server-side rejections are query errors; everything else means the
/// connection is unusable.
fn classify(error: sqlx::Error) -> IntrospectError {
    match error {
        sqlx::Error::Database(e) => IntrospectError::query(e.to_string()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => IntrospectError::query(error.to_string()),
        other => IntrospectError::connection(other.to_string()),
    }
}
