//! # Tolk Config
//!
//! Declarative configuration for a tolk localizer.
//!
//! This crate provides the configuration schema, defaults, file loading in
//! TOML, YAML or JSON, and validation of the loaded values.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validator;

pub use error::{ConfigError, ConfigResult};
pub use loader::*;
pub use schema::*;
pub use validator::*;
