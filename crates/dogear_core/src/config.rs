use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct DogearConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub recent: RecentSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct StoreSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct RecentSection {
    pub limit: Option<usize>,
}

impl DogearConfig {
    /// Store path from config with a leading `~/` expanded against `home`.
    pub fn store_path(&self, home: Option<&Path>) -> Result<Option<PathBuf>> {
        let Some(raw) = self.store.path.as_deref() else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        expand_home(trimmed, home).map(Some)
    }

    pub fn recent_limit(&self) -> usize {
        self.recent.limit.unwrap_or(DEFAULT_RECENT_LIMIT)
    }
}

/// Load and parse a DogearConfig from a TOML file. Returns default if file doesn't exist.
pub fn load_config(config_path: &Path) -> Result<DogearConfig> {
    if !config_path.exists() {
        return Ok(DogearConfig::default());
    }
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let parsed: DogearConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    Ok(parsed)
}

pub fn expand_home(value: &str, home: Option<&Path>) -> Result<PathBuf> {
    if value == "~" || value.starts_with("~/") {
        let Some(home) = home else {
            bail!("cannot expand `{value}`: home directory is unknown");
        };
        let rest = value.trim_start_matches('~').trim_start_matches('/');
        if rest.is_empty() {
            return Ok(home.to_path_buf());
        }
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(value))
}
