//! TableGen CLI - table scaffold generator

use tablegen_cli::cli;
use tablegen_cli::config;
use tablegen_cli::generate::{self, GenerateError, GenerateRequest};
use tablegen_cli::output;
use tablegen_cli::prompt;
#[cfg(feature = "serve")]
use tablegen_cli::server;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{Args, OutputFormat};

/// Introspection failed or found nothing to scaffold.
const EXIT_FAILURE: u8 = 1;
/// Configuration error (missing settings, bad config file, invalid request).
const EXIT_CONFIG_ERROR: u8 = 66;

const LOG_ENV: &str = "TABLEGEN_LOG";

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    #[cfg(feature = "serve")]
    if args.serve {
        return run_serve_mode(&args);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tablegen: error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,tablegen_core=debug,tablegen_cli=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<GenerateError>() {
        Some(GenerateError::NoColumns(_) | GenerateError::Introspect(_)) => EXIT_FAILURE,
        _ => EXIT_CONFIG_ERROR,
    }
}

/// Merge config file and arguments, prompting for what is still missing.
fn resolve(args: &Args, schema_only: bool) -> Result<GenerateRequest> {
    let file_config = config::load_config(args.config.as_deref())?;
    let mut request = config::resolve_request(args, &file_config)?;

    if !args.no_prompt && io::stdin().is_terminal() {
        prompt::prompt_missing(&mut request, schema_only)?;
    }
    Ok(request)
}

/// Run the CLI in serve mode.
#[cfg(feature = "serve")]
fn run_serve_mode(args: &Args) -> ExitCode {
    use server::ServerConfig;

    let defaults = match config::load_config(args.config.as_deref())
        .and_then(|file_config| config::resolve_request(args, &file_config))
    {
        Ok(request) => request,
        Err(e) => {
            eprintln!("tablegen: error: {e:#}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let config = ServerConfig {
        port: args.port,
        defaults,
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("tablegen: error: failed to create tokio runtime: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match runtime.block_on(server::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tablegen: server error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: Args) -> Result<()> {
    if args.comments {
        let request = resolve(&args, true)?;
        let comments = generate::schema_comments(&request)?;
        let json = output::format_comments_json(&comments, args.compact)?;
        return write_output(args.out.as_deref(), &json);
    }

    let request = resolve(&args, false)?;
    request.validate()?;
    let response = generate::generate(&request)?;
    tracing::debug!(table = %response.table_name, columns = response.column_count, "generated");

    if args.copy {
        let copied = output::copy_or_warn(&response.generated_code, output::copy_to_clipboard);
        if let Some(warning) = copied {
            eprintln!("{warning}");
        }
    }

    match args.format {
        OutputFormat::Scaffold => {
            if args.stdout {
                return write_output(None, &response.generated_code);
            }
            let path = args.out.clone().unwrap_or_else(|| {
                PathBuf::from(tablegen_render::output_file_name(
                    &response.table_name,
                    request.template_type,
                ))
            });
            write_output(Some(&path), &response.generated_code)?;
            eprintln!(
                "tablegen: wrote {} column(s) to {}",
                response.column_count,
                path.display()
            );
            Ok(())
        }
        OutputFormat::Json => {
            let json = output::format_json(&response, args.compact)?;
            write_output(args.out.as_deref(), &json)
        }
        OutputFormat::Table => {
            let colored = args.out.is_none() && io::stdout().is_terminal();
            let table = output::format_table(&response, colored);
            write_output(args.out.as_deref(), &table)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content).with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure newline at end for terminal output
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
