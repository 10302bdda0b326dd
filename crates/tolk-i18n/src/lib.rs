//! On-demand translation lookup for tolk
//!
//! Translations are organized by locale and module. A module's resource for a
//! locale is loaded the first time that pair is selected and cached for the
//! lifetime of the [`Localizer`]. This crate provides:
//!
//! - Deduplicated, lazily scheduled resource loading
//! - Flat-key-first lookup with nested `<:key/>` and `<:module:key/>` references
//! - Locale fallback ending in a visible `locales:module:key` marker
//! - Pluggable template compilation (plain interpolation or Fluent)
//! - Inline markup tags rendered into caller-defined values
//! - Memoized key-path navigation
//!
//! # Example
//!
//! ```rust
//! use tolk_i18n::{args, Localizer, MemoryLoader, Resource};
//!
//! # async fn example() {
//! let loader = MemoryLoader::new().with(
//!     "en-US",
//!     "common",
//!     [("greeting", "Hello, {name}!")].into_iter().collect::<Resource>(),
//! );
//! let localizer = Localizer::builder(loader).build();
//! localizer.set_modules(["common"]);
//! localizer.set_locales(["pt-BR", "en-US"]);
//! localizer.wait().await;
//!
//! let t = localizer.t();
//! let text = t.get("common").get("greeting").call(Some(&args!["name" => "Ana"]));
//! assert_eq!(text, "Hello, Ana!");
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod args;
pub mod error;
pub mod formatter;
pub mod loader;
pub mod localizer;
pub mod parser;
pub mod proxy;
pub mod resolver;
pub mod resource;
pub mod store;
pub mod tags;

pub use args::{ArgValue, Args};
pub use error::{I18nError, I18nResult};
pub use formatter::{missing_translation, Formatter};
pub use loader::{DirectoryLoader, FnLoader, MemoryLoader, ResourceLoader, SyncFnLoader};
pub use localizer::{Localizer, LocalizerBuilder};
pub use parser::{CompiledTemplate, FluentParser, FnParser, Interpolator, TemplateParser};
pub use proxy::KeyPath;
pub use resolver::{KeyResolver, Reference};
pub use resource::Resource;
pub use store::{
    LoadFuture, Notifier, NotifyFn, ResourceStore, Selection, SubscribeFn, SubscriptionId,
};
pub use tags::{concat_tag, parse_tags, Markup, TagFn, TagMap};

pub use tolk_common::{Locale, Module};
