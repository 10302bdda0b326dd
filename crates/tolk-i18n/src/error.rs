//! Error types for resolution and formatting

use thiserror::Error;

/// Errors that can occur while resolving or formatting a translation
///
/// None of these escape [`crate::Localizer::format`]; they drive locale
/// fallback and surface only through logs and lower-level APIs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// The load collaborator failed for a locale/module pair
    #[error("Failed to load resource {locale}/{module}: {message}")]
    LoadFailure {
        /// Locale of the failed pair
        locale: String,
        /// Module of the failed pair
        module: String,
        /// Loader error with its context chain
        message: String,
    },

    /// No leaf exists at the key path
    #[error("Missing key {module}:{key} for locale {locale}")]
    KeyMissing {
        /// Locale that was tried
        locale: String,
        /// Module that was searched
        module: String,
        /// Dotted key path
        key: String,
    },

    /// The key path resolves to an intermediate node instead of a string
    #[error("Key {module}:{key} for locale {locale} is not a leaf")]
    KeyPartial {
        /// Locale that was tried
        locale: String,
        /// Module that was searched
        module: String,
        /// Dotted key path
        key: String,
    },

    /// `<:ref/>` expansion exceeded the configured depth
    #[error("Nested reference chain too deep for locale {locale}: {}", chain.join(" -> "))]
    CyclicReference {
        /// Locale being expanded
        locale: String,
        /// `module:key` references followed, outermost first
        chain: Vec<String>,
    },

    /// The parse collaborator rejected a template
    #[error("Failed to parse template {key}: {message}")]
    Parse {
        /// Dotted key path of the template
        key: String,
        /// Parser diagnostics
        message: String,
    },

    /// A compiled template failed while producing its value
    #[error("Failed to format template {key}: {errors:?}")]
    Format {
        /// Dotted key path of the template
        key: String,
        /// Errors reported while formatting
        errors: Vec<String>,
    },

    /// The locale identifier is not understood by the template engine
    #[error("Invalid language identifier: {0}")]
    InvalidLocale(String),
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;
