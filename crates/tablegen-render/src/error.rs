//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur while choosing or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Unknown template type: {0} (expected html, thymeleaf or mustache)")]
    UnknownTemplate(String),
}
