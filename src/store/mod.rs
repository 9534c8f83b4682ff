//! Index Document Store
//!
//! The persisted form of a data system: its hierarchy and its structure tree,
//! stored as one document next to the root. Storage backends implement
//! [`IndexStorage`]; every write replaces the whole document.

pub mod persistence;

pub use persistence::JsonFileStorage;

use crate::error::Result;
use crate::hierarchy::Hierarchy;
use crate::tree::Structure;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persisted index document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub hierarchy: Hierarchy,
    #[serde(default)]
    pub structure: Structure,
}

impl IndexDocument {
    pub fn new(hierarchy: Hierarchy) -> Self {
        Self {
            hierarchy,
            structure: Structure::new(),
        }
    }
}

/// Index document storage interface
pub trait IndexStorage: Send + Sync {
    /// Whether a document has been written yet.
    fn exists(&self) -> bool;
    fn load(&self) -> Result<IndexDocument>;
    fn save(&self, document: &IndexDocument) -> Result<()>;

    /// Whether `candidate` is a file this backend writes under the root.
    /// Such files are never indexed.
    fn owns(&self, _candidate: &Path) -> bool {
        false
    }
}
