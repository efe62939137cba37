//! Copying the generated scaffold to the system clipboard.

use std::fmt::Display;

/// Put `text` on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)
}

/// Run `copy` on `text`, turning a failure into the warning line to print.
///
/// A missing clipboard (headless session, no display server) never fails
/// the run.
pub fn copy_or_warn<F, E>(text: &str, copy: F) -> Option<String>
where
    F: FnOnce(&str) -> Result<(), E>,
    E: Display,
{
    match copy(text) {
        Ok(()) => None,
        Err(e) => {
            tracing::debug!(error = %e, "clipboard unavailable");
            Some(format!("tablegen: warning: could not copy to clipboard: {e}"))
        }
    }
}
