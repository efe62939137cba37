//! TableGen CLI library.
//!
//! This module exposes internal types for testing purposes.
//! The main entry point is the `tablegen` binary.

pub mod cli;
pub mod config;
pub mod generate;
pub mod metadata;
pub mod output;
pub mod prompt;
#[cfg(feature = "serve")]
pub mod server;

// Re-export commonly used types
pub use cli::Args;
pub use generate::{generate, GenerateError, GenerateRequest, GenerateResponse};
