//! # Tolk Common
//!
//! Shared identifiers, key-path helpers and logging bootstrap for tolk.
//!
//! This crate provides the foundational types used across the other crates
//! in the tolk workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use logging::{init_default_logging, init_logging, LoggingConfig};
pub use types::*;
pub use utils::*;
