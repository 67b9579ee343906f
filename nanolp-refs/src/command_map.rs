//! Chunk name → source location table used by the mapped policy
//!
//! The table is produced by the tool that rendered the documents, as a JSON object:
//!
//! ```text
//! { "main": "", "main.0": "", "utils": "utils.html", "build": "Makefile" }
//! ```
//!
//! An empty location means "this document". Key order is kept as written, it is the order in
//! which wildcard pastes list their matches.

use crate::error::RefsError;
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl CommandMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of strings.
    pub fn from_json_str(source: &str) -> Result<Self, RefsError> {
        let object: Map<String, Value> = serde_json::from_str(source)
            .map_err(|e| RefsError::InvalidCommandMap(e.to_string()))?;

        let mut map = Self::new();
        for (name, location) in object {
            match location {
                Value::String(location) => map.insert(name, location),
                other => {
                    return Err(RefsError::InvalidCommandMap(format!(
                        "location of '{}' must be a string, found {}",
                        name, other
                    )))
                }
            }
        }
        Ok(map)
    }

    /// Insert or replace a location. A replaced name keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, location: impl Into<String>) {
        let name = name.into();
        let location = location.into();
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = location,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, location));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Chunk names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, location)| (name.as_str(), location.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite every location, keeping names and order.
    pub fn try_map_locations<E>(
        &self,
        mut f: impl FnMut(&str, &str) -> Result<String, E>,
    ) -> Result<CommandMap, E> {
        let mut mapped = CommandMap::new();
        for (name, location) in self.iter() {
            mapped.insert(name, f(name, location)?);
        }
        Ok(mapped)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CommandMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = CommandMap::new();
        for (name, location) in iter {
            map.insert(name, location);
        }
        map
    }
}
