//! Default values for every configuration section.

use crate::schema::{
    LocalizerConfig, LoggingSettings, ResourceFormat, ResourcesConfig, TemplateEngine,
    TemplatesConfig,
};
use std::path::PathBuf;

/// Default depth guard for nested `<:ref/>` expansion.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Default directory holding resource files.
pub const DEFAULT_RESOURCE_DIR: &str = "locales";

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            locales: Vec::new(),
            modules: Vec::new(),
            resources: ResourcesConfig::default(),
            templates: TemplatesConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_RESOURCE_DIR),
            format: ResourceFormat::default(),
        }
    }
}

impl Default for ResourceFormat {
    fn default() -> Self {
        Self::Json
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            engine: TemplateEngine::default(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::Interpolate
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}
