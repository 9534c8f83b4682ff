//! Structure tree
//!
//! The nested, path-keyed index of entries. One node level per hierarchy
//! level; children are kept in sorted segment order, which is also the order
//! entries are walked in.

pub mod node;

pub use node::{Entry, Node};

use crate::error::{DataSystemError, Result};
use crate::types::Schema;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Root of the structure tree. Always intermediate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Structure {
    children: BTreeMap<String, Node>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &BTreeMap<String, Node> {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Node at the given segment chain, if present.
    pub fn get<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Node> {
        let (last, parents) = segments.split_last()?;
        let mut children = &self.children;
        for segment in parents {
            children = children.get(segment.as_ref())?.children()?;
        }
        children.get(last.as_ref())
    }

    /// Entry stored at exactly this segment chain.
    pub fn entry<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Entry> {
        self.get(segments).and_then(Node::as_entry)
    }

    /// Upsert a leaf at `segments`, creating intermediate nodes as needed.
    ///
    /// Existing schema keys are overwritten by `schema`; keys only present
    /// before are kept. Adding beneath a leaf, or over an intermediate node
    /// that already has children, is a [`DataSystemError::StructureConflict`].
    /// On error the tree may hold new empty intermediate nodes; callers
    /// discard it.
    pub fn upsert<S: AsRef<str>>(&mut self, segments: &[S], schema: Schema) -> Result<()> {
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| DataSystemError::Argument("entry path has no segments".to_string()))?;
        let path = segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("/");

        let mut children = &mut self.children;
        for segment in parents {
            let node = children
                .entry(segment.as_ref().to_string())
                .or_insert_with(Node::empty);
            children = match node {
                Node::Intermediate(next) => next,
                Node::Leaf(existing) => {
                    return Err(DataSystemError::StructureConflict(format!(
                        "cannot add {} beneath existing entry {}",
                        path, existing.path
                    )));
                }
            };
        }

        match children.get_mut(last.as_ref()) {
            Some(Node::Leaf(existing)) => {
                existing.path = path;
                for (key, value) in schema {
                    existing.schema.insert(key, value);
                }
            }
            Some(Node::Intermediate(below)) if !below.is_empty() => {
                return Err(DataSystemError::StructureConflict(format!(
                    "cannot add {} over {} existing child node(s)",
                    path,
                    below.len()
                )));
            }
            _ => {
                children.insert(last.as_ref().to_string(), Node::Leaf(Entry { path, schema }));
            }
        }
        Ok(())
    }

    /// Lazy depth-first walk over all leaf entries.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            stack: vec![self.children.values()],
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries().count()
    }
}

impl<'de> Deserialize<'de> for Structure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        let children = node::children_from_object(object).map_err(de::Error::custom)?;
        Ok(Structure { children })
    }
}

/// Iterator over leaf entries in stored order.
pub struct Entries<'a> {
    stack: Vec<btree_map::Values<'a, String, Node>>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        while let Some(level) = self.stack.last_mut() {
            match level.next() {
                Some(Node::Leaf(entry)) => return Some(entry),
                Some(Node::Intermediate(children)) => self.stack.push(children.values()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}
