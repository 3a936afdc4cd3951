//! YAML loader for the driver configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::DriverConfig;

/// Reads `DriverConfig` from a YAML file on disk.
///
/// A missing or empty file yields the defaults. Relative key paths are
/// resolved against a base directory, the working directory in production.
pub struct YamlConfigLoader {
    path: PathBuf,
}

impl YamlConfigLoader {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load and resolve relative key paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_relative_to(&self, base: &Path) -> Result<DriverConfig> {
        let mut config = if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)
                .with_context(|| format!("cannot read {}", self.path.display()))?;
            if content.trim().is_empty() {
                DriverConfig::default()
            } else {
                serde_yaml::from_str(&content)
                    .with_context(|| format!("cannot parse {}", self.path.display()))?
            }
        } else {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            DriverConfig::default()
        };
        config.private_key = absolutize(base, &config.private_key);
        config.public_key = absolutize(base, &config.public_key);
        Ok(config)
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
