//! Entry Queries
//!
//! Read-only views over a [`Structure`]: level-value filtering and schema-key
//! lookup. Level values and keys are compared after [`sanitize`].

use crate::hierarchy::{sanitize, Hierarchy};
use crate::tree::{Entries, Entry, Structure};
use crate::types::Filters;
use std::collections::HashSet;

/// Structural identity used to yield each entry once: its path plus its sorted schema keys.
type EntryIdentity<'a> = (&'a str, Vec<&'a str>);

fn identity(entry: &Entry) -> EntryIdentity<'_> {
    let mut keys: Vec<&str> = entry.schema.keys().map(String::as_str).collect();
    keys.sort_unstable();
    (entry.path.as_str(), keys)
}

/// Coordinate of `entry` at `level`, if its path reaches that deep.
pub fn coordinate<'e>(hierarchy: &Hierarchy, entry: &'e Entry, level: &str) -> Option<&'e str> {
    let index = hierarchy.position(level)?;
    entry.segments().nth(index)
}

/// Entries matching every level filter, each yielded once.
pub struct Filtered<'a> {
    entries: Entries<'a>,
    hierarchy: &'a Hierarchy,
    filters: Vec<(String, String)>,
    yielded: HashSet<EntryIdentity<'a>>,
}

impl<'a> Filtered<'a> {
    pub fn new(structure: &'a Structure, hierarchy: &'a Hierarchy, filters: &Filters) -> Self {
        Self {
            entries: structure.entries(),
            hierarchy,
            filters: filters
                .iter()
                .map(|(level, value)| (level.clone(), sanitize(value)))
                .collect(),
            yielded: HashSet::new(),
        }
    }

    fn matches(&self, entry: &Entry) -> bool {
        self.filters.iter().all(|(level, wanted)| {
            coordinate(self.hierarchy, entry, level)
                .map(|value| sanitize(value) == *wanted)
                .unwrap_or(false)
        })
    }
}

impl<'a> Iterator for Filtered<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        while let Some(entry) = self.entries.next() {
            if !self.matches(entry) {
                continue;
            }
            if self.yielded.insert(identity(entry)) {
                return Some(entry);
            }
        }
        None
    }
}

/// Filtered entries whose schema carries a given key.
pub struct Find<'a> {
    inner: Filtered<'a>,
    key: String,
}

impl<'a> Find<'a> {
    pub fn new(
        structure: &'a Structure,
        hierarchy: &'a Hierarchy,
        key: &str,
        filters: &Filters,
    ) -> Self {
        Self {
            inner: Filtered::new(structure, hierarchy, filters),
            key: sanitize(key),
        }
    }
}

impl<'a> Iterator for Find<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        let key = &self.key;
        self.inner
            .by_ref()
            .find(|entry| entry.schema.keys().any(|k| sanitize(k) == *key))
    }
}
