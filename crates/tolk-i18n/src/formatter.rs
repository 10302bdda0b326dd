//! Locale fallback and compiled template caching

use crate::args::Args;
use crate::error::I18nResult;
use crate::parser::{CompiledTemplate, TemplateParser};
use crate::resolver::KeyResolver;
use crate::store::ResourceStore;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tolk_common::{join_key_path, Locale, Module};
use tracing::{debug, warn};

type TemplateKey = (Locale, Module, Vec<String>);

/// The visible marker returned when no locale can produce a translation:
/// `{locales joined by '|'}:{module}:{dotted key}`.
pub fn missing_translation(locales: &[Locale], module: &Module, key: &[String]) -> String {
    let locales: Vec<&str> = locales.iter().map(Locale::as_str).collect();
    format!("{}:{}:{}", locales.join("|"), module, join_key_path(key))
}

/// Formats translations, trying the active locales in priority order.
///
/// Compiled templates are cached per (locale, module, key) for the lifetime
/// of the formatter and never recompiled.
pub struct Formatter {
    store: Arc<ResourceStore>,
    resolver: KeyResolver,
    parser: Arc<dyn TemplateParser>,
    templates: DashMap<TemplateKey, CompiledTemplate>,
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("resolver", &self.resolver)
            .field("templates", &self.templates.len())
            .finish_non_exhaustive()
    }
}

impl Formatter {
    /// Create a new formatter
    pub fn new(
        store: Arc<ResourceStore>,
        parser: Arc<dyn TemplateParser>,
        max_nesting_depth: usize,
    ) -> Self {
        Self {
            resolver: KeyResolver::new(Arc::clone(&store), max_nesting_depth),
            store,
            parser,
            templates: DashMap::new(),
        }
    }

    /// The resolver used for lookups.
    pub fn resolver(&self) -> &KeyResolver {
        &self.resolver
    }

    /// Number of cached compiled templates.
    pub fn cached_templates(&self) -> usize {
        self.templates.len()
    }

    /// Formats `key` in `module` with the first locale that succeeds.
    ///
    /// Never fails: when every locale fails the result is the
    /// [`missing_translation`] marker.
    pub fn format(&self, module: &Module, key: &[String], args: Option<&Args>) -> String {
        let selection = self.store.selection();

        for locale in selection.locales.iter() {
            match self.format_locale(locale, module, key, args) {
                Ok(text) => return text,
                Err(err) => {
                    // Pairs that never loaded are expected to miss.
                    if self.store.is_loaded(locale, module) {
                        warn!(%locale, %module, "Translation failed, trying next locale: {err}");
                    }
                }
            }
        }

        missing_translation(&selection.locales, module, key)
    }

    /// Formats `key` for exactly one locale.
    pub fn format_locale(
        &self,
        locale: &Locale,
        module: &Module,
        key: &[String],
        args: Option<&Args>,
    ) -> I18nResult<String> {
        let raw = self.resolver.read(locale, module, key)?;
        let template = self.template(locale, module, key, &raw)?;
        template(args)
    }

    fn template(
        &self,
        locale: &Locale,
        module: &Module,
        key: &[String],
        raw: &str,
    ) -> I18nResult<CompiledTemplate> {
        let cache_key = (locale.clone(), module.clone(), key.to_vec());
        if let Some(template) = self.templates.get(&cache_key) {
            return Ok(Arc::clone(template.value()));
        }

        debug!(%locale, %module, key = %join_key_path(key), "Compiling template");
        let template = self.parser.parse(locale, module, key, raw)?;
        Ok(Arc::clone(
            self.templates.entry(cache_key).or_insert(template).value(),
        ))
    }
}
