//! Error types for configuration loading and validation.

use thiserror::Error;

/// Errors that can occur while loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        /// Path of the file that failed to load
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid for its format
    #[error("Failed to parse {format} configuration: {message}")]
    Parse {
        /// Format the text was parsed as
        format: &'static str,
        /// Parser diagnostic
        message: String,
    },

    /// The file extension does not name a supported format
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// The configuration parsed but holds invalid values
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
