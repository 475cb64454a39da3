use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use keyindex_indexer::ReindexOptions;
use keyindex_keywords::KeywordConfig;
use serde::Deserialize;

pub(crate) const CONFIG_ENV: &str = "KEYINDEX_CONFIG";

/// Settings read from the optional TOML file. Command line flags are applied
/// on top of these.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub keywords: KeywordConfig,
    pub reindex: ReindexOptions,
}

impl FileConfig {
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        let config: FileConfig = toml::from_str(raw)?;
        config.keywords.validate()?;
        Ok(config)
    }
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        env::var(CONFIG_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

pub(crate) fn load_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let Some(path) = config_path(explicit) else {
        return Ok(FileConfig::default());
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = FileConfig::parse(&raw)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    log::debug!("Loaded config from {}: {config:?}", path.display());
    Ok(config)
}
