//! Lazily built key-path navigation
//!
//! A [`KeyPath`] is a node in an infinitely deep tree: the first segment
//! below the root names the module and every further segment extends the
//! key. Children are created on first access and memoized, so navigating the
//! same path twice returns the same node.
//!
//! ```rust,no_run
//! # use tolk_i18n::{args, Localizer, MemoryLoader};
//! # let localizer = Localizer::builder(MemoryLoader::new()).build();
//! let t = localizer.t();
//! let greeting = t.get("common").get("greeting").call(Some(&args!["name" => "Ana"]));
//!
//! let section = "billing";
//! let title = t.get("settings").this().get(section).get("title").call(None);
//! # let _ = (greeting, title);
//! ```

use crate::args::Args;
use crate::localizer::Core;
use crate::tags::{parse_tags, Markup, TagMap};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tolk_common::{join_key_path, Module, KEY_SEPARATOR};

struct Node<T> {
    module: Option<Module>,
    key: Vec<String>,
    children: DashMap<String, KeyPath<T>>,
    core: Arc<Core<T>>,
}

/// A node of the key-path tree; cheap to clone.
pub struct KeyPath<T = String> {
    node: Arc<Node<T>>,
}

impl<T> Clone for KeyPath<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T> fmt::Debug for KeyPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPath")
            .field("module", &self.node.module)
            .field("key", &self.node.key)
            .field("children", &self.node.children.len())
            .finish()
    }
}

impl<T> fmt::Display for KeyPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node.module {
            Some(module) => write!(f, "{module}:{}", join_key_path(&self.node.key)),
            None => Ok(()),
        }
    }
}

impl<T> KeyPath<T> {
    pub(crate) fn root(core: Arc<Core<T>>) -> Self {
        Self {
            node: Arc::new(Node {
                module: None,
                key: Vec::new(),
                children: DashMap::new(),
                core,
            }),
        }
    }

    /// Navigates to a child segment.
    ///
    /// Below the root the segment selects the module; deeper segments extend
    /// the key.
    #[must_use]
    pub fn get(&self, segment: impl AsRef<str>) -> Self {
        let segment = segment.as_ref();
        if let Some(child) = self.node.children.get(segment) {
            return child.clone();
        }

        let (module, key) = match &self.node.module {
            None => (Module::from(segment), Vec::new()),
            Some(module) => {
                let mut key = self.node.key.clone();
                key.push(segment.to_string());
                (module.clone(), key)
            }
        };
        let child = Self {
            node: Arc::new(Node {
                module: Some(module),
                key,
                children: DashMap::new(),
                core: Arc::clone(&self.node.core),
            }),
        };

        self.node
            .children
            .entry(segment.to_string())
            .or_insert(child)
            .clone()
    }

    /// Navigates a dotted path one segment at a time.
    #[must_use]
    pub fn path(&self, dotted: &str) -> Self {
        dotted
            .split(KEY_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .fold(self.clone(), |node, segment| node.get(segment))
    }

    /// Returns this node.
    ///
    /// Marks where statically known navigation ends and runtime-computed
    /// segments begin, so such call sites are easy to find.
    #[must_use]
    pub fn this(&self) -> Self {
        self.clone()
    }

    /// The module this node addresses, `None` at the root.
    pub fn module(&self) -> Option<&Module> {
        self.node.module.as_ref()
    }

    /// Key segments accumulated below the module.
    pub fn key(&self) -> &[String] {
        &self.node.key
    }

    /// Whether both handles point at the same memoized node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Formats the translation at this path.
    pub fn call(&self, args: Option<&Args>) -> String {
        let module = self
            .node
            .module
            .clone()
            .unwrap_or_else(|| Module::from(""));
        self.node.core.formatter.format(&module, &self.node.key, args)
    }

    /// Formats the translation at this path and renders its inline tags.
    ///
    /// Tags missing from `tags` render with the localizer's fallback wrapper.
    pub fn call_tagged(&self, args: Option<&Args>, tags: &TagMap<T>) -> Markup<T> {
        parse_tags(&self.call(args), tags, &self.node.core.fallback_tag)
    }
}
