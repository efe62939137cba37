//! JSON output formatting.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::generate::GenerateResponse;

fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.context("Failed to serialize JSON output")
}

/// Format a generation result as JSON.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_json(response: &GenerateResponse, compact: bool) -> Result<String> {
    to_json(response, compact)
}

/// Format a column-name to comment dictionary, sorted by name.
pub fn format_comments_json(comments: &BTreeMap<String, String>, compact: bool) -> Result<String> {
    to_json(comments, compact)
}
