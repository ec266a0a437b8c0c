//! An insertion-ordered interning set, pairing a `HashMap` index with an
//! ordered `Vec`, so the encoder's `literalMap` and `structureMap` iterate
//! in the exact order their entries were first interned.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Default)]
pub struct OrderedMap<K> {
    index: HashMap<K, usize>,
    keys: Vec<K>,
}

impl<K: Eq + Hash + Clone> OrderedMap<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            keys: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns the existing index for `key` if one was already interned,
    /// otherwise assigns it the next index (insertion order) and returns
    /// that.
    pub fn intern(&mut self, key: K) -> usize {
        if let Some(&index) = self.index.get(&key) {
            return index;
        }

        let index = self.keys.len();
        self.index.insert(key.clone(), index);
        self.keys.push(key);
        index
    }

    pub fn key_at(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }
}
