//! Output formatting modules.

pub mod clipboard;
pub mod json;
pub mod table;

pub use clipboard::{copy_or_warn, copy_to_clipboard};
pub use json::{format_comments_json, format_json};
pub use table::format_table;
