use std::sync::OnceLock;

use regex::Regex;

use crate::TemplateKind;

/// Name fragments that mark a column as a monetary amount.
pub const MONEY_KEYWORDS: [&str; 4] = ["amt", "amount", "fee", "price"];

/// Turn a column name into header text.
///
/// Underscores become spaces, camelCase humps are split, and every word is
/// capitalized: `reg_date` and `regDate` both become `Reg Date`.
pub fn humanize(name: &str) -> String {
    static CAMEL_HUMP: OnceLock<Regex> = OnceLock::new();
    let re = CAMEL_HUMP
        .get_or_init(|| Regex::new(r"([a-z])([A-Z]+)").expect("Invalid regex pattern"));

    let spaced = name.replace('_', " ");
    let spaced = re.replace_all(&spaced, "$1 $2");

    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let rest = chars.as_str().to_lowercase();
                    first.to_uppercase().chain(rest.chars()).collect()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn is_money_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    MONEY_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Default output file name for a table (or query) scaffold.
pub fn output_file_name(stem: &str, kind: TemplateKind) -> String {
    let stem = stem.trim();
    let stem = if stem.is_empty() { "custom_query_result" } else { stem };
    let sanitized: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' { c } else { '_' })
        .collect();
    format!("{sanitized}.{}", kind.file_extension())
}
