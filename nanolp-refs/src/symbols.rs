//! Chunks defined during one run

use std::collections::HashSet;

/// Insertion-ordered set of defined chunk names.
///
/// Built fresh for every document and dropped afterwards. A name defined several times keeps
/// the place of its first definition.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    names: Vec<String>,
    known: HashSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition. Returns `false` if the name was already known.
    pub fn insert(&mut self, name: &str) -> bool {
        if !self.known.insert(name.to_string()) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Defined names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
