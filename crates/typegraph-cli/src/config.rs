use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use typegraph_schema::SchemaConfig;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "typegraph.toml";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// Loads the schema config from `explicit`, else from `typegraph.toml` in
/// the working directory, else the defaults.
pub fn load(explicit: Option<&Path>) -> Result<SchemaConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };
    let config = match path {
        Some(path) => load_file(&path)?.schema,
        None => SchemaConfig::default(),
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid [schema] configuration: {e}"))?;
    Ok(config)
}

fn load_file(path: &Path) -> Result<CliConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let cfg: CliConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(cfg)
}
