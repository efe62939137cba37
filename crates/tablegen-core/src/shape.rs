//! Query shape reader for query mode.
//!
//! The shape of an ad-hoc query is learned by wrapping it as a subquery under
//! a `WHERE 1=0` filter and asking the driver to describe the result set.
//! No rows are scanned or fetched.

use sqlparser::ast::Statement;
use sqlparser::parser::Parser;

use crate::connection::CatalogConnection;
use crate::dialect::DialectProfile;
use crate::error::IntrospectError;
use crate::types::ShapeColumn;
#[cfg(feature = "tracing")]
use tracing::debug;

/// Describe the columns `query` would produce.
///
/// # Errors
/// Returns [`IntrospectError::Query`] when the query is empty, is not a single
/// read-only query, or is rejected by the database as a subquery.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(connection, profile), fields(profile = %profile))
)]
pub fn read_shape<C: CatalogConnection + ?Sized>(
    connection: &mut C,
    profile: DialectProfile,
    query: &str,
) -> Result<Vec<ShapeColumn>, IntrospectError> {
    let query = prepare_query(profile, query)?;
    let shape = connection.describe(&profile.shape_sql(query))?;

    #[cfg(feature = "tracing")]
    debug!(columns = shape.len(), "described query shape");

    Ok(shape)
}

/// Trim the query and refuse text that cannot be a sub-selectable query.
///
/// Trailing comments and statement terminators are dropped. Text that
/// sqlparser understands must be exactly one query statement. Text it cannot
/// parse is passed through; the database has the final say.
pub fn prepare_query(profile: DialectProfile, query: &str) -> Result<&str, IntrospectError> {
    let query = trim_trailing(query.trim_start(), profile == DialectProfile::MySql);
    if query.is_empty() {
        return Err(IntrospectError::query("query is empty"));
    }

    let dialect = profile.to_sqlparser_dialect();
    match Parser::parse_sql(dialect.as_ref(), query) {
        Ok(statements) => {
            if statements.len() > 1 {
                return Err(IntrospectError::query(format!(
                    "expected a single query, found {} statements",
                    statements.len()
                )));
            }
            match statements.first() {
                Some(Statement::Query(_)) | None => Ok(query),
                Some(_) => Err(IntrospectError::query(
                    "only read-only SELECT queries can be introspected",
                )),
            }
        }
        Err(_err) => {
            #[cfg(feature = "tracing")]
            debug!(error = %_err, "query not understood by sqlparser, passing through");
            Ok(query)
        }
    }
}

/// Cut `query` after its last token that is not a `;`, so trailing
/// whitespace, comments and terminators go away.
///
/// Quoted text is skipped; `backslash_escapes` treats `\` inside quotes as
/// an escape, as MySQL does.
fn trim_trailing(query: &str, backslash_escapes: bool) -> &str {
    let mut end = 0;
    let mut chars = query.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '-' if chars.peek().is_some_and(|&(_, next)| next == '-') => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek().is_some_and(|&(_, next)| next == '*') => {
                chars.next();
                let mut star = false;
                for (_, c) in chars.by_ref() {
                    if star && c == '/' {
                        break;
                    }
                    star = c == '*';
                }
            }
            '\'' | '"' | '`' => {
                let mut last = i + c.len_utf8();
                let mut escaped = false;
                for (j, inner) in chars.by_ref() {
                    last = j + inner.len_utf8();
                    if escaped {
                        escaped = false;
                    } else if backslash_escapes && inner == '\\' {
                        escaped = true;
                    } else if inner == c {
                        break;
                    }
                }
                end = last;
            }
            ';' => {}
            c if c.is_whitespace() => {}
            c => end = i + c.len_utf8(),
        }
    }

    &query[..end]
}
