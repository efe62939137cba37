//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tablegen_render::TemplateKind;

/// TableGen - table scaffold generator
#[derive(Parser, Debug)]
#[command(name = "tablegen")]
#[command(about = "Generate table scaffolds from database metadata", long_about = None)]
#[command(version)]
pub struct Args {
    /// Database connection URL (e.g., mysql://host:3306/shop, postgres://host/db)
    #[arg(long, value_name = "URL")]
    pub db: Option<String>,

    /// Database user (overrides the user in the URL)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Database password
    #[arg(short, long = "pass", value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Schema of the table; default schema for tables referenced by --query
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Table to scaffold (`schema.table` overrides --schema)
    #[arg(short, long)]
    pub table: Option<String>,

    /// Scaffold the result columns of a SELECT query instead of a table
    #[arg(short, long, value_name = "SQL", conflicts_with = "query_file")]
    pub query: Option<String>,

    /// Read the SELECT query from a file
    #[arg(long, value_name = "FILE")]
    pub query_file: Option<PathBuf>,

    /// Template flavor (defaults to the config file value, then html)
    #[arg(long, value_enum)]
    pub template: Option<TemplateArg>,

    /// Comma-separated column names to leave out
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Comma-separated column names to keep (overrides --exclude)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Output file (defaults to `<table>.<ext>` in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Print the scaffold to stdout instead of writing a file
    #[arg(long, conflicts_with = "out")]
    pub stdout: bool,

    /// Output format
    #[arg(short, long, default_value = "scaffold", value_enum)]
    pub format: OutputFormat,

    /// Print the schema-wide unambiguous column comments as JSON
    #[arg(long)]
    pub comments: bool,

    /// Also copy the generated scaffold to the clipboard
    #[arg(long, conflicts_with = "comments")]
    pub copy: bool,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Config file (defaults to ./tablegen.toml, then ~/.tablegen/tablegen.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Never prompt for missing connection settings
    #[arg(long)]
    pub no_prompt: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Start the HTTP generation API
    #[cfg(feature = "serve")]
    #[arg(long)]
    pub serve: bool,

    /// Port for HTTP server (default: 3000)
    #[cfg(feature = "serve")]
    #[arg(long, default_value = "3000")]
    pub port: u16,
}

/// Template flavor options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateArg {
    Html,
    Thymeleaf,
    Mustache,
}

impl From<TemplateArg> for TemplateKind {
    fn from(t: TemplateArg) -> Self {
        match t {
            TemplateArg::Html => TemplateKind::Html,
            TemplateArg::Thymeleaf => TemplateKind::Thymeleaf,
            TemplateArg::Mustache => TemplateKind::Mustache,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Rendered template source
    Scaffold,
    /// Column descriptors as JSON
    Json,
    /// Column descriptors as a text table
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_conversion() {
        let kind: TemplateKind = TemplateArg::Thymeleaf.into();
        assert_eq!(kind, TemplateKind::Thymeleaf);
    }

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::parse_from(["tablegen"]);
        assert!(args.db.is_none());
        assert!(args.template.is_none());
        assert_eq!(args.format, OutputFormat::Scaffold);
        assert!(args.exclude.is_empty());
        assert!(!args.stdout);
        assert!(!args.copy);
        assert!(!args.no_prompt);
    }

    #[test]
    fn test_parse_full_args() {
        let args = Args::parse_from([
            "tablegen",
            "--db",
            "mysql://localhost:3306/shop",
            "-u",
            "app",
            "-p",
            "secret",
            "-s",
            "shop",
            "-t",
            "orders",
            "--template",
            "mustache",
            "--exclude",
            "memo,updated_at",
            "-o",
            "orders.mustache",
            "-f",
            "json",
            "--compact",
            "--no-prompt",
            "-v",
        ]);
        assert_eq!(args.db.as_deref(), Some("mysql://localhost:3306/shop"));
        assert_eq!(args.user.as_deref(), Some("app"));
        assert_eq!(args.password.as_deref(), Some("secret"));
        assert_eq!(args.schema.as_deref(), Some("shop"));
        assert_eq!(args.table.as_deref(), Some("orders"));
        assert_eq!(args.template, Some(TemplateArg::Mustache));
        assert_eq!(args.exclude, vec!["memo", "updated_at"]);
        assert_eq!(args.out.unwrap().to_str().unwrap(), "orders.mustache");
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.compact);
        assert!(args.no_prompt);
        assert!(args.verbose);
    }

    #[test]
    fn test_only_repeated() {
        let args = Args::parse_from(["tablegen", "--only", "id", "--only", "name,price"]);
        assert_eq!(args.only, vec!["id", "name", "price"]);
    }

    #[test]
    fn test_copy_is_only_for_scaffolds() {
        assert!(Args::parse_from(["tablegen", "-t", "orders", "--copy", "--stdout"]).copy);
        assert!(Args::try_parse_from(["tablegen", "--copy", "--comments"]).is_err());
    }

    #[test]
    fn test_query_conflicts_with_query_file() {
        let result = Args::try_parse_from(["tablegen", "-q", "SELECT 1", "--query-file", "q.sql"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_stdout_conflicts_with_out() {
        let result = Args::try_parse_from(["tablegen", "--stdout", "-o", "x.html"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_template_rejected() {
        let result = Args::try_parse_from(["tablegen", "--template", "jsp"]);
        assert!(result.is_err());
    }

    #[cfg(feature = "serve")]
    #[test]
    fn test_serve_args_defaults() {
        let args = Args::parse_from(["tablegen", "--serve"]);
        assert!(args.serve);
        assert_eq!(args.port, 3000);
    }

    #[cfg(feature = "serve")]
    #[test]
    fn test_serve_args_custom_port() {
        let args = Args::parse_from(["tablegen", "--serve", "--port", "8080"]);
        assert!(args.serve);
        assert_eq!(args.port, 8080);
    }
}
