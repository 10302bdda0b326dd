//! Configuration loading from TOML, YAML or JSON files.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LocalizerConfig, ResourceFormat};
use crate::validator::ConfigValidator;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration loader reading a single file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this loader reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the configuration, choosing the format from the
    /// file extension.
    pub async fn load(&self) -> ConfigResult<LocalizerConfig> {
        let format = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ResourceFormat::from_extension)
            .ok_or_else(|| ConfigError::UnsupportedFormat(self.path.display().to_string()))?;

        debug!("Loading configuration file: {:?}", self.path);

        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let config = Self::from_str(&text, format)?;
        info!(
            locales = config.locales.len(),
            modules = config.modules.len(),
            "Loaded configuration from {:?}",
            self.path
        );
        Ok(config)
    }

    /// Parses and validates configuration text in the given format.
    pub fn from_str(text: &str, format: ResourceFormat) -> ConfigResult<LocalizerConfig> {
        let config: LocalizerConfig = match format {
            ResourceFormat::Json => serde_json::from_str(text).map_err(|e| ConfigError::Parse {
                format: "json",
                message: e.to_string(),
            })?,
            ResourceFormat::Yaml => serde_yaml::from_str(text).map_err(|e| ConfigError::Parse {
                format: "yaml",
                message: e.to_string(),
            })?,
            ResourceFormat::Toml => toml::from_str(text).map_err(|e| ConfigError::Parse {
                format: "toml",
                message: e.to_string(),
            })?,
        };

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
