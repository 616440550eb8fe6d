//! Component identity and the state map.

use std::fmt;

use indexmap::IndexMap;

use crate::value::Value;

/// Identifier assigned to a component at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentId(pub u32);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Insertion-ordered mapping from identifier to value.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StateMap {
    entries: IndexMap<String, Value>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a single entry.
    pub fn insert(&mut self, identifier: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(identifier.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(identifier, value);
        self
    }

    /// Get a value by identifier.
    pub fn get(&self, identifier: &str) -> Option<&Value> {
        self.entries.get(identifier)
    }

    /// Check if an identifier is present.
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Merge `partial` into this map. Later keys overwrite, absent keys are untouched.
    pub fn merge(&mut self, partial: StateMap) {
        for (identifier, value) in partial.entries {
            self.entries.insert(identifier, value);
        }
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Iterate over identifiers in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for StateMap
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for StateMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
