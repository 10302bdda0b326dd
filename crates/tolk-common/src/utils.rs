//! Key-path and ordered-set helpers.

use std::collections::HashSet;
use std::hash::Hash;

/// Separator between key-path segments in their flattened form.
pub const KEY_SEPARATOR: char = '.';

/// Splits a dotted key into its segments.
///
/// An empty input yields an empty path.
pub fn split_key_path(key: &str) -> Vec<String> {
    if key.is_empty() {
        return Vec::new();
    }
    key.split(KEY_SEPARATOR).map(str::to_string).collect()
}

/// Joins key-path segments into the flattened dotted form.
pub fn join_key_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut joined = String::new();
    for (index, segment) in segments.iter().enumerate() {
        if index > 0 {
            joined.push(KEY_SEPARATOR);
        }
        joined.push_str(segment.as_ref());
    }
    joined
}

/// Collects an iterator into a vector keeping only the first occurrence of
/// each element.
pub fn dedup_ordered<T, I>(items: I) -> Vec<T>
where
    T: Clone + Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
