//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tolk_common::{LoggingConfig, Locale, Module};

/// Main configuration structure for a localizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizerConfig {
    /// Active locales in priority order.
    pub locales: Vec<String>,
    /// Active resource modules.
    pub modules: Vec<String>,
    /// Resource location configuration.
    pub resources: ResourcesConfig,
    /// Template compilation configuration.
    pub templates: TemplatesConfig,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

/// Where the directory loader finds resource files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Base directory; files live at `{dir}/{locale}/{module}.{ext}`.
    pub dir: PathBuf,
    /// Serialization format of the resource files.
    pub format: ResourceFormat,
}

/// Serialization format of resource files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFormat {
    /// `.json` files.
    Json,
    /// `.yaml` files.
    Yaml,
    /// `.toml` files.
    Toml,
}

impl ResourceFormat {
    /// File extension used for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }

    /// Picks the format matching a file extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Template compilation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Which template engine compiles resolved strings.
    pub engine: TemplateEngine,
    /// Maximum depth of `<:ref/>` expansion before a reference is treated as cyclic.
    pub max_nesting_depth: usize,
}

/// Available template engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateEngine {
    /// Plain `{name}` interpolation.
    Interpolate,
    /// Fluent syntax with plural and select expressions.
    Fluent,
}

/// Logging section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level filter directive.
    pub level: String,
    /// Emit JSON lines instead of human readable output.
    pub json: bool,
    /// Optional log file.
    pub file: Option<String>,
}

impl LocalizerConfig {
    /// Active locales as typed identifiers.
    #[must_use]
    pub fn locale_ids(&self) -> Vec<Locale> {
        self.locales.iter().map(Locale::from).collect()
    }

    /// Active modules as typed identifiers.
    #[must_use]
    pub fn module_ids(&self) -> Vec<Module> {
        self.modules.iter().map(Module::from).collect()
    }
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            level: settings.level.clone(),
            json_format: settings.json,
            file_path: settings.file.clone(),
            ..Self::default()
        }
    }
}
