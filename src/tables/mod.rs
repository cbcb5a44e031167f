//! Symbol tables read from the TABLES section

use indexmap::IndexMap;

pub mod layer;

pub use layer::{Layer, LayerFlags};

/// Base trait for table entries
pub trait TableEntry {
    /// Get the entry's name
    fn name(&self) -> &str;
}

/// Named entries in file order, looked up case-insensitively
#[derive(Debug, Clone)]
pub struct Table<T: TableEntry> {
    entries: IndexMap<String, T, ahash::RandomState>,
}

impl<T: TableEntry> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Table {
            entries: IndexMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// Add an entry; a later entry with the same name replaces the earlier one
    /// but keeps its position
    pub fn add(&mut self, entry: T) {
        self.entries.insert(entry.name().to_uppercase(), entry);
    }

    /// Get an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&name.to_uppercase())
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in file order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Get all entry names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name())
    }
}

impl<T: TableEntry> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}
