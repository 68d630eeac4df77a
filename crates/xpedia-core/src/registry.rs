use std::collections::HashMap;

/// Anything stored in a [`Registry`]: addressed by a string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Insertion-ordered entity store with a key index.
///
/// Registering an entry under a key that already exists replaces the entry
/// in place, keeping its original position. Entities refer to one another
/// only by key, so the registry is the single owner of every entry.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<T>,
    key_to_index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            key_to_index: HashMap::new(),
        }
    }
}

impl<T: Keyed> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry. Returns `true` if it replaced an existing one.
    pub fn insert(&mut self, entry: T) -> bool {
        match self.key_to_index.get(entry.key()) {
            Some(&index) => {
                self.entries[index] = entry;
                true
            }
            None => {
                self.key_to_index
                    .insert(entry.key().to_string(), self.entries.len());
                self.entries.push(entry);
                false
            }
        }
    }

    /// Lookup an entry by key.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.key_to_index.get(key).map(|&i| &self.entries[i])
    }

    /// Mutable lookup, used while installing back-references.
    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.key_to_index.get(key).map(|&i| &mut self.entries[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.key_to_index.contains_key(key)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Keyed::key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Push `value` onto a back-reference list unless it is already present.
pub(crate) fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
