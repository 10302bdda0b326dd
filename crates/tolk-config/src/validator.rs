//! Runtime validation of loaded configuration values.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::LocalizerConfig;
use std::collections::HashSet;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    pub fn validate(config: &LocalizerConfig) -> ConfigResult<()> {
        Self::validate_names("locale", &config.locales)?;
        Self::validate_names("module", &config.modules)?;

        // `<:module:key/>` splits on ':'
        if let Some(module) = config.modules.iter().find(|m| m.contains(':')) {
            return Err(ConfigError::Validation(format!(
                "module name '{module}' must not contain ':'"
            )));
        }

        if config.templates.max_nesting_depth == 0 {
            return Err(ConfigError::Validation(
                "templates.max_nesting_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_names(kind: &str, names: &[String]) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for name in names {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(format!("empty {kind} name")));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate {kind} '{name}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(locales: &[&str], modules: &[&str]) -> LocalizerConfig {
        LocalizerConfig {
            locales: locales.iter().map(ToString::to_string).collect(),
            modules: modules.iter().map(ToString::to_string).collect(),
            ..LocalizerConfig::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(ConfigValidator::validate(&config(&["en-US", "pt-BR"], &["common"])).is_ok());
    }

    #[test]
    fn test_duplicate_locale() {
        let err = ConfigValidator::validate(&config(&["en-US", "en-US"], &[])).unwrap_err();
        assert!(err.to_string().contains("duplicate locale 'en-US'"));
    }

    #[test]
    fn test_empty_module_name() {
        assert!(ConfigValidator::validate(&config(&["en-US"], &[" "])).is_err());
    }

    #[test]
    fn test_module_with_colon() {
        let err = ConfigValidator::validate(&config(&["en-US"], &["a:b"])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_zero_depth() {
        let mut config = config(&["en-US"], &["common"]);
        config.templates.max_nesting_depth = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
