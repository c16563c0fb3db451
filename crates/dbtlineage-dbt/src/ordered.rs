//! Insertion-ordered id map for manifest sections
//!
//! dbt writes `nodes` and `sources` as JSON objects. Lookups need the id key,
//! while "first match wins" semantics need the order entries appear in the
//! file, which `HashMap` throws away.

use serde::de::{self, DeserializeOwned, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Map from unique_id to entry, iterated in artifact order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<T> {
    entries: Vec<(String, T)>,
    positions: HashMap<String, usize>,
}

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T> OrderedMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. A repeated key replaces the value in place, keeping
    /// its original position.
    pub fn insert(&mut self, id: String, value: T) {
        match self.positions.get(&id) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.positions.insert(id.clone(), self.entries.len());
                self.entries.push((id, value));
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.positions.get(id).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in artifact order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(id, value)| (id.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }
}

impl<T> FromIterator<(String, T)> for OrderedMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, value) in iter {
            map.insert(id, value);
        }
        map
    }
}

struct OrderedMapVisitor<T>(PhantomData<T>);

impl<'de, T: DeserializeOwned> Visitor<'de> for OrderedMapVisitor<T> {
    type Value = OrderedMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of unique_id to manifest entry")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(OrderedMap::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(OrderedMap::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();

        while let Some((id, raw)) = access.next_entry::<String, serde_json::Value>()? {
            // One malformed entry must not take the whole artifact down
            match T::deserialize(raw) {
                Ok(value) => map.insert(id, value),
                Err(e) => tracing::debug!(%id, error = %e, "skipping malformed manifest entry"),
            }
        }

        Ok(map)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OrderedMapVisitor(PhantomData))
    }
}
