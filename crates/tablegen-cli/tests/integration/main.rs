//! Integration tests for the tablegen CLI with real databases.
//!
//! These tests are behind the `integration-tests` feature flag and won't run
//! with regular `cargo test`. Each suite creates its own tables and reads
//! its connection URL from the environment.

#![cfg(feature = "integration-tests")]

mod mysql;
mod postgres;

use std::process::{Command, Output};

/// Run the tablegen CLI with the given arguments and return the output.
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tablegen"))
        .args(args)
        .arg("--no-prompt")
        .output()
        .expect("failed to execute tablegen CLI")
}

/// Run the tablegen CLI and assert it succeeds.
pub fn run_cli_success(args: &[&str]) -> Output {
    let output = run_cli(args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!(
            "CLI failed with status {:?}\nstderr: {}\nstdout: {}",
            output.status.code(),
            stderr,
            stdout
        );
    }
    output
}

/// Parse `-f json` output.
pub fn json_output(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| {
        panic!("Expected valid JSON output, but parsing failed: {e}\nOutput was: {stdout}")
    })
}

/// Column names of a JSON generation result, in order.
pub fn column_names(json: &serde_json::Value) -> Vec<String> {
    json["columns"]
        .as_array()
        .expect("columns array")
        .iter()
        .map(|c| c["name"].as_str().expect("column name").to_string())
        .collect()
}
