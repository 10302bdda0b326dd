//! Test utilities and shared test helpers for tolk.
//!
//! This module provides common testing utilities, fixtures, and helper functions
//! that can be used across all crates in the workspace for unit and integration testing.

use std::sync::Once;
use tokio::runtime::Runtime;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a tokio runtime for testing async functions.
/// This is useful for tests that need to run async code in a synchronous test context.
pub fn create_test_runtime() -> Runtime {
    Runtime::new().expect("Failed to create test runtime")
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// A minimal valid localizer configuration as YAML.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
locales: ["en-US"]
modules: ["common"]
"#
    }

    /// A localizer configuration exercising every section, as TOML.
    pub fn full_config_toml() -> &'static str {
        concat!(
            "locales = [\"pt-BR\", \"en-US\"]\n",
            "modules = [\"common\", \"checkout\"]\n",
            "\n",
            "[resources]\n",
            "dir = \"i18n\"\n",
            "format = \"yaml\"\n",
            "\n",
            "[templates]\n",
            "engine = \"fluent\"\n",
            "max_nesting_depth = 8\n",
            "\n",
            "[logging]\n",
            "level = \"debug\"\n",
            "json = true\n"
        )
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use crate::{Locale, Module};
    use proptest::prelude::*;

    /// Strategy for generating BCP 47 shaped locale identifiers.
    pub fn locale_strategy() -> impl Strategy<Value = Locale> {
        r"[a-z]{2}(-[A-Z]{2})?".prop_map(Locale)
    }

    /// Strategy for generating module names (never containing `:`).
    pub fn module_strategy() -> impl Strategy<Value = Module> {
        r"[a-z][a-z_]{0,11}".prop_map(Module)
    }

    /// Strategy for generating a single key-path segment.
    pub fn key_segment_strategy() -> impl Strategy<Value = String> {
        r"[a-zA-Z_][a-zA-Z0-9_]{0,9}"
    }

    /// Strategy for text sprinkled with markup-like fragments, balanced or not.
    pub fn markup_text_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                r"[a-z0-9 ]{0,6}",
                r"<[a-c]>",
                r"</[a-c]>",
                r"<[a-c]/>",
                Just("<".to_string()),
                Just(">".to_string()),
                Just("</>".to_string()),
            ],
            0..16,
        )
        .prop_map(|parts| parts.concat())
    }
}
