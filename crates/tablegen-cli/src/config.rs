//! Config file discovery and merging with command-line arguments.
//!
//! ```toml
//! template = "thymeleaf"
//!
//! [db]
//! url = "mysql://localhost:3306/shop"
//! user = "app"
//! password = "secret"
//! schema = "shop"
//! table = "orders"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tablegen_render::TemplateKind;

use crate::cli::Args;
use crate::generate::GenerateRequest;

pub const CONFIG_FILE_NAME: &str = "tablegen.toml";
const CONFIG_DIR_NAME: &str = ".tablegen";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub db: DbConfig,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub schema: Option<String>,
    pub table: Option<String>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to load {}", path.display()))
    }
}

/// Places searched for a config file, in order.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    paths
}

/// Load `explicit`, or the first config file found in [`candidate_paths`].
///
/// No config file at all is not an error.
pub fn load_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return FileConfig::load(path);
    }
    match candidate_paths().into_iter().find(|path| path.is_file()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using config file");
            FileConfig::load(&path)
        }
        None => Ok(FileConfig::default()),
    }
}

/// Merge `args` over `file` into a generation request.
///
/// Reads `--query-file` when given.
pub fn resolve_request(args: &Args, file: &FileConfig) -> Result<GenerateRequest> {
    let template_type = match (args.template, file.template.as_deref()) {
        (Some(arg), _) => arg.into(),
        (None, Some(name)) => name
            .parse::<TemplateKind>()
            .context("Invalid template in config file")?,
        (None, None) => TemplateKind::default(),
    };

    let sql_query = match &args.query_file {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read query file {}", path.display()))?,
        ),
        None => args.query.clone(),
    };

    let db = &file.db;
    Ok(GenerateRequest {
        db_url: args.db.clone().or_else(|| db.url.clone()),
        user: args.user.clone().or_else(|| db.user.clone()),
        password: args.password.clone().or_else(|| db.password.clone()),
        schema: args.schema.clone().or_else(|| db.schema.clone()),
        table: args.table.clone().or_else(|| db.table.clone()),
        sql_query,
        template_type,
        exclude: args.exclude.clone(),
        only: args.only.clone(),
    })
}
