//! The recursive string tree returned by resource loaders

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tolk_common::join_key_path;

/// A loaded translation resource.
///
/// Leaves are always strings; any other scalar in a resource file is a
/// deserialization error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resource {
    /// A template string
    Text(String),
    /// Nested keys
    Table(BTreeMap<String, Resource>),
}

impl Default for Resource {
    fn default() -> Self {
        Self::empty()
    }
}

impl Resource {
    /// An empty table, substituted when a load fails.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Table(BTreeMap::new())
    }

    /// Returns the template string if this is a leaf.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Table(_) => None,
        }
    }

    /// Returns `true` for a table without entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Table(entries) if entries.is_empty())
    }

    /// Child entry of a table.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Table(entries) => entries.get(key),
            Self::Text(_) => None,
        }
    }

    /// Looks up a key path.
    ///
    /// The flattened key (`"a.b.c"` as one top-level entry) wins over the
    /// nested path `a -> b -> c`, so authors may use either layout.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<&Self> {
        if let Some(flat) = self.child(&join_key_path(path)) {
            return Some(flat);
        }
        path.iter()
            .try_fold(self, |node, segment| node.child(segment.as_ref()))
    }
}

impl From<&str> for Resource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<K: Into<String>, V: Into<Self>> FromIterator<(K, V)> for Resource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Table(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
