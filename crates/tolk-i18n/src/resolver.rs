//! Key lookup and nested reference expansion
//!
//! A leaf may embed other leaves with self-closing reference markers:
//! `<:key.path/>` for the same module or `<:module:key.path/>` for another
//! module. References are expanded recursively, for the same locale, before
//! the string reaches a template parser.

use crate::error::{I18nError, I18nResult};
use crate::resource::Resource;
use crate::store::ResourceStore;
use std::sync::Arc;
use tolk_common::{join_key_path, split_key_path, Locale, Module};
use tracing::trace;

const REFERENCE_OPEN: &str = "<:";
const REFERENCE_CLOSE: &str = "/>";

/// A `<:ref/>` marker found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Target module; `None` means the referencing module
    pub module: Option<Module>,
    /// Target key path
    pub key: Vec<String>,
}

impl Reference {
    /// Parses the text between `<:` and `/>`.
    ///
    /// Pieces split on `:` are read from the end: the last is the key, the
    /// one before it (if any) the module.
    pub fn parse(inner: &str) -> Self {
        let mut pieces = inner.rsplit(':');
        let key = split_key_path(pieces.next().unwrap_or_default());
        let module = pieces.next().map(Module::from);
        Self { module, key }
    }
}

/// Finds the next reference marker at or after `from`, returning its byte
/// range and inner text.
fn next_reference(text: &str, from: usize) -> Option<(usize, usize, &str)> {
    let mut cursor = from;
    while let Some(offset) = text[cursor..].find(REFERENCE_OPEN) {
        let start = cursor + offset;
        let inner_start = start + REFERENCE_OPEN.len();
        let Some(gt) = text[inner_start..].find('>') else {
            return None;
        };
        let end = inner_start + gt + 1;
        if let Some(inner) = text[inner_start..end].strip_suffix(REFERENCE_CLOSE) {
            if !inner.is_empty() {
                return Some((start, end, inner));
            }
        }
        cursor = inner_start;
    }
    None
}

/// Resolves key paths against loaded resources.
#[derive(Debug)]
pub struct KeyResolver {
    store: Arc<ResourceStore>,
    max_depth: usize,
}

impl KeyResolver {
    /// Create a new resolver; expansion deeper than `max_depth` references
    /// fails with [`I18nError::CyclicReference`].
    pub fn new(store: Arc<ResourceStore>, max_depth: usize) -> Self {
        Self { store, max_depth }
    }

    /// Reads the fully expanded string at `key` for one locale and module.
    ///
    /// The pair's notifier observes the access whatever the outcome.
    pub fn read(&self, locale: &Locale, module: &Module, key: &[String]) -> I18nResult<String> {
        let mut chain = Vec::new();
        self.read_nested(locale, module, key, &mut chain)
    }

    fn read_nested(
        &self,
        locale: &Locale,
        module: &Module,
        key: &[String],
        chain: &mut Vec<String>,
    ) -> I18nResult<String> {
        chain.push(format!("{module}:{}", join_key_path(key)));
        if chain.len() > self.max_depth.saturating_add(1) {
            return Err(I18nError::CyclicReference {
                locale: locale.to_string(),
                chain: chain.clone(),
            });
        }

        let resource = self.store.resource(locale, module);
        let raw = resource.as_deref().and_then(|resource| resource.lookup(key));
        if let Some(notifier) = self.store.notifier(locale, module) {
            notifier(key, raw);
        }

        let text = match raw {
            Some(Resource::Text(text)) => text,
            Some(Resource::Table(_)) => {
                return Err(I18nError::KeyPartial {
                    locale: locale.to_string(),
                    module: module.to_string(),
                    key: join_key_path(key),
                })
            }
            None => {
                return Err(I18nError::KeyMissing {
                    locale: locale.to_string(),
                    module: module.to_string(),
                    key: join_key_path(key),
                })
            }
        };

        let expanded = self.expand(locale, module, text, chain)?;
        chain.pop();
        Ok(expanded)
    }

    fn expand(
        &self,
        locale: &Locale,
        module: &Module,
        text: &str,
        chain: &mut Vec<String>,
    ) -> I18nResult<String> {
        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;

        while let Some((start, end, inner)) = next_reference(text, cursor) {
            let reference = Reference::parse(inner);
            let target = reference.module.as_ref().unwrap_or(module);
            trace!(%locale, %target, key = inner, "Expanding nested reference");

            output.push_str(&text[cursor..start]);
            output.push_str(&self.read_nested(locale, target, &reference.key, chain)?);
            cursor = end;
        }

        output.push_str(&text[cursor..]);
        Ok(output)
    }
}
