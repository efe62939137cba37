//! Interactive prompts for connection settings missing from args and config.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password};

use crate::generate::GenerateRequest;

/// A request field that can be asked for interactively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DbUrl,
    User,
    Password,
    Table,
    Schema,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Self::DbUrl => "Database URL",
            Self::User => "User",
            Self::Password => "Password",
            Self::Table => "Table",
            Self::Schema => "Schema",
        }
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Fields still missing from `request`, in prompt order.
///
/// A password is only asked for when none was given at all; an empty one
/// is a valid answer. Table and schema are skipped in query mode, and the
/// schema is skipped when the table is qualified. With `schema_only` the
/// table is never asked for.
pub fn missing_fields(request: &GenerateRequest, schema_only: bool) -> Vec<Field> {
    let mut fields = Vec::new();
    if blank(&request.db_url) {
        fields.push(Field::DbUrl);
    }
    if blank(&request.user) {
        fields.push(Field::User);
    }
    if request.password.is_none() {
        fields.push(Field::Password);
    }

    let query_mode = !blank(&request.sql_query);
    if schema_only {
        if blank(&request.schema) {
            fields.push(Field::Schema);
        }
        return fields;
    }
    if query_mode {
        return fields;
    }

    let table = request.table.as_deref().map(str::trim).unwrap_or_default();
    if table.is_empty() {
        fields.push(Field::Table);
    }
    if blank(&request.schema) && !table.contains('.') {
        fields.push(Field::Schema);
    }
    fields
}

/// Ask for every missing field on the terminal.
pub fn prompt_missing(request: &mut GenerateRequest, schema_only: bool) -> Result<()> {
    let theme = ColorfulTheme::default();

    for field in missing_fields(request, schema_only) {
        if field == Field::Password {
            let password = Password::with_theme(&theme)
                .with_prompt(field.label())
                .allow_empty_password(true)
                .interact()?;
            request.password = Some(password);
            continue;
        }

        let value: String = Input::with_theme(&theme)
            .with_prompt(field.label())
            .allow_empty(field == Field::User)
            .interact_text()?;
        let slot = match field {
            Field::DbUrl => &mut request.db_url,
            Field::User => &mut request.user,
            Field::Table => &mut request.table,
            Field::Schema => &mut request.schema,
            Field::Password => unreachable!("handled above"),
        };
        *slot = Some(value.trim().to_string());
    }

    Ok(())
}
