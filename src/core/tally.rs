//! Insertion-ordered frequency counting.
//!
//! Every ranking in this crate breaks ties by first appearance: when two keys
//! have the same count, the one seen earlier while scanning submissions in
//! store order wins. [`FrequencyTable`] keeps that order explicitly so the
//! rule does not depend on hash map iteration.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count<K> {
    pub key: K,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    entries: Vec<Count<K>>,
    index: HashMap<K, usize>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table that lists `keys` up front with zero counts, in the given order.
    pub fn with_keys(keys: impl IntoIterator<Item = K>) -> Self {
        let mut table = Self::new();
        for key in keys {
            table.slot(key);
        }
        table
    }

    pub fn increment(&mut self, key: K) {
        let position = self.slot(key);
        self.entries[position].count += 1;
    }

    pub fn get(&self, key: &K) -> usize {
        self.index
            .get(key)
            .map(|&position| self.entries[position].count)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[Count<K>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Count<K>> {
        self.entries
    }

    /// Key with the highest count; the earliest key wins a tie.
    pub fn most_common(&self) -> Option<&Count<K>> {
        self.entries.iter().fold(None, |best, entry| match best {
            Some(current) if current.count >= entry.count => Some(current),
            _ => Some(entry),
        })
    }

    /// Entries sorted by descending count, ties kept in first-seen order.
    pub fn ranked(&self) -> Vec<Count<K>> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    fn slot(&mut self, key: K) -> usize {
        if let Some(&position) = self.index.get(&key) {
            return position;
        }
        let position = self.entries.len();
        self.index.insert(key.clone(), position);
        self.entries.push(Count { key, count: 0 });
        position
    }
}

impl<K: Clone + Eq + Hash> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.increment(key);
        }
        table
    }
}
