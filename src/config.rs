//! Optional per-store configuration read from `.murmur/config.yaml`.

use crate::query::DEFAULT_TRENDING_LIMIT;
use crate::storage::MURMUR_DIR;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name within the .murmur directory.
pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How many tags `trending` returns
    pub trending_limit: usize,

    /// Where the CLI writes its log file (default: platform data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trending_limit: DEFAULT_TRENDING_LIMIT,
            log_dir: None,
        }
    }
}

impl Config {
    pub fn path(root: &Path) -> PathBuf {
        root.join(MURMUR_DIR).join(CONFIG_FILE)
    }

    /// Load the config for the store at `root`; defaults if there is no file.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
        log::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Write the default config for the store at `root` unless one exists.
    pub fn init(root: &Path) -> Result<()> {
        if Self::path(root).exists() {
            return Ok(());
        }
        Self::default().save(root)
    }

    /// Write this config to the store at `root`.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);
        let text = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))
    }
}
