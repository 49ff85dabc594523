use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{ForecastError, Result};
use crate::model::ModelBundle;

pub const DEFAULT_FILE_PREFIX: &str = "model_lag";
pub const DEFAULT_FILE_SUFFIX: &str = ".json";

/// Directory of per-lag model bundles named `<prefix><lag><suffix>`.
///
/// The store never caches: every `load` reads and decodes the file again.
#[derive(Debug, Clone)]
pub struct BundleStore {
    dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl BundleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_naming(dir, DEFAULT_FILE_PREFIX, DEFAULT_FILE_SUFFIX)
    }

    pub fn with_naming(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, lag: usize) -> PathBuf {
        self.dir.join(format!("{}{}{}", self.prefix, lag, self.suffix))
    }

    /// Lag encoded in a bundle file name, if the name follows the store's pattern.
    pub fn parse_lag(&self, file_name: &str) -> Option<usize> {
        let digits = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Only canonical names: `path_for` must map the lag back to this file.
        digits
            .parse::<usize>()
            .ok()
            .filter(|lag| *lag > 0 && lag.to_string() == digits)
    }

    pub fn load(&self, lag: usize) -> Result<ModelBundle> {
        let path = self.path_for(lag);
        if !path.is_file() {
            return Err(ForecastError::NotFound { lag });
        }
        load_bundle_from_path(&path, lag)
    }

    /// Ascending, de-duplicated lags that have a bundle file.
    pub fn available_lags(&self) -> Result<Vec<usize>> {
        let mut lags = BTreeSet::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(lag) = entry.file_name().to_str().and_then(|n| self.parse_lag(n)) {
                lags.insert(lag);
            }
        }
        Ok(lags.into_iter().collect())
    }

    /// Write a bundle under its recorded lag. Returns the written path.
    pub fn save(&self, bundle: &ModelBundle) -> Result<PathBuf> {
        let path = self.path_for(bundle.lag());
        persist_bundle_to_path(&path, bundle)?;
        Ok(path)
    }
}

pub fn load_bundle_from_path(path: &Path, lag: usize) -> Result<ModelBundle> {
    let bundle_error = |reason: String| ForecastError::Bundle {
        path: path.to_path_buf(),
        reason,
    };
    let payload = std::fs::read_to_string(path)?;
    let bundle: ModelBundle = serde_json::from_str(&payload)
        .map_err(|e| bundle_error(format!("failed to parse bundle json: {}", e)))?;
    bundle.validate(lag).map_err(bundle_error)?;
    Ok(bundle)
}

pub fn persist_bundle_to_path(path: &Path, bundle: &ModelBundle) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(bundle).map_err(|e| ForecastError::Bundle {
        path: path.to_path_buf(),
        reason: format!("failed to serialize bundle json: {}", e),
    })?;
    std::fs::write(path, json)?;
    Ok(())
}
