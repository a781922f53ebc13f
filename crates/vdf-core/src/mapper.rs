//! Ordered containers that parsed documents are materialized into.
//!
//! Every reader is generic over a [`Mapper`], so the caller picks the
//! container:
//!
//! - [`Document`] keeps one entry per key. Re-inserting a key replaces the
//!   value in place, keeping the position of the first occurrence.
//! - [`MultiDocument`] keeps every entry, duplicates included, in file order.
//!   Pair it with `merge_duplicate_keys = false` to see a file exactly as it
//!   was written.
//!
//! Both store entries in insertion order in a `Vec<(String, Value)>`; key
//! lookups are linear scans. `Document::insert` looks up the key first, so
//! building one flat level of n keys costs O(n²) comparisons.

use std::collections::HashSet;

use crate::types::Value;

/// An insertion-ordered string-keyed map that readers can build into and
/// writers can walk.
pub trait Mapper: Default + Sized {
    /// Store `value` under `key`. Whether an existing key is replaced or
    /// duplicated is up to the implementation.
    fn insert(&mut self, key: String, value: Value<Self>);

    /// The value stored under `key` (the first one, if duplicated).
    fn get(&self, key: &str) -> Option<&Value<Self>>;

    fn get_mut(&mut self, key: &str) -> Option<&mut Value<Self>>;

    /// Entries in insertion order.
    fn iter(&self) -> impl Iterator<Item = (&str, &Value<Self>)>;

    /// Number of entries, duplicates included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Ordered map with unique keys. The default output of every reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: Vec<(String, Value)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace. A replaced key keeps its original position; the
    /// previous value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The string stored under `key`, if there is one.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The nested mapping stored under `key`, if there is one.
    pub fn get_mapping(&self, key: &str) -> Option<&Document> {
        self.get(key).and_then(Value::as_mapping)
    }

    /// Remove `key`, shifting later entries down.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Mapper for Document {
    fn insert(&mut self, key: String, value: Value<Self>) {
        Document::insert(self, key, value);
    }

    fn get(&self, key: &str) -> Option<&Value<Self>> {
        Document::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Value<Self>> {
        Document::get_mut(self, key)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &Value<Self>)> {
        Document::iter(self)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Ordered map that keeps duplicate keys.
///
/// Lookups by key address the first occurrence; [`MultiDocument::get_all`]
/// returns every value stored under a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiDocument {
    entries: Vec<(String, Value<MultiDocument>)>,
}

impl MultiDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, even if `key` is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value<MultiDocument>>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value<MultiDocument>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value<MultiDocument>> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Every value stored under `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Value<MultiDocument>> {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Remove every entry stored under `key`. Returns how many were removed.
    pub fn remove_all(&mut self, key: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        before - self.entries.len()
    }

    /// True if any key repeats at this level or in any nested mapping.
    pub fn has_duplicates(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.entries.len());
        if !self.entries.iter().all(|(k, _)| seen.insert(k.as_str())) {
            return true;
        }
        self.entries.iter().any(|(_, v)| match v {
            Value::Mapping(m) => m.has_duplicates(),
            _ => false,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<MultiDocument>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Mapper for MultiDocument {
    fn insert(&mut self, key: String, value: Value<Self>) {
        MultiDocument::insert(self, key, value);
    }

    fn get(&self, key: &str) -> Option<&Value<Self>> {
        MultiDocument::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Value<Self>> {
        MultiDocument::get_mut(self, key)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &Value<Self>)> {
        MultiDocument::iter(self)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Into<String>, V: Into<Value<MultiDocument>>> FromIterator<(K, V)> for MultiDocument {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for MultiDocument {
    type Item = (String, Value<MultiDocument>);
    type IntoIter = std::vec::IntoIter<(String, Value<MultiDocument>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
