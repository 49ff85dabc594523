use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bundle_store::{BundleStore, DEFAULT_FILE_PREFIX, DEFAULT_FILE_SUFFIX};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    pub dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

fn default_file_suffix() -> String {
    DEFAULT_FILE_SUFFIX.to_string()
}

impl ModelsConfig {
    pub fn store(&self) -> BundleStore {
        self.store_at(&self.dir)
    }

    /// Store rooted at `dir` that keeps the configured file naming.
    pub fn store_at(&self, dir: impl Into<PathBuf>) -> BundleStore {
        BundleStore::with_naming(dir, &self.file_prefix, &self.file_suffix)
    }
}

impl Config {
    /// Load `config/default.toml` (or `VF_CONFIG_PATH`) and apply env overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("VF_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::load_from_path(&config_path)?;

        if let Ok(dir) = std::env::var("VF_MODEL_DIR") {
            config.models.dir = PathBuf::from(dir);
        }
        if let Ok(bind) = std::env::var("VF_BIND") {
            config.server.bind = bind;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            bail!("server.bind must not be empty");
        }
        if self.models.file_prefix.is_empty() {
            bail!("models.file_prefix must not be empty");
        }
        Ok(())
    }
}
