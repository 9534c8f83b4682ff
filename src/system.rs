//! Data System
//!
//! [`DataSystem`] binds a root directory to its hierarchy and structure.
//! The index document inside the root is the source of truth: opening reads
//! it, every [`DataSystem::add`] rewrites it, and [`DataSystem::reload`]
//! picks up changes made by other handles.

use crate::config::DataSystemsConfig;
use crate::error::{DataSystemError, Result};
use crate::hierarchy::Hierarchy;
use crate::naming::{name, NameArg, Namer};
use crate::query::{Filtered, Find};
use crate::store::{IndexDocument, IndexStorage, JsonFileStorage};
use crate::tree::{Entries, Structure};
use crate::types::{Filters, Schema};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

pub struct DataSystem {
    root: PathBuf,
    hierarchy: Hierarchy,
    structure: Structure,
    storage: Box<dyn IndexStorage>,
    config: DataSystemsConfig,
}

impl fmt::Debug for DataSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSystem")
            .field("root", &self.root)
            .field("hierarchy", &self.hierarchy)
            .field("entries", &self.structure.entry_count())
            .finish_non_exhaustive()
    }
}

impl DataSystem {
    /// Create a data system at `root`, or reattach to an existing one with the same hierarchy.
    pub fn create<I, S>(root: impl AsRef<Path>, levels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::create_with_config(root, levels, DataSystemsConfig::default())
    }

    pub fn create_with_config<I, S>(
        root: impl AsRef<Path>,
        levels: I,
        config: DataSystemsConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let root = checked_root(root.as_ref())?;
        let storage = default_storage(&root, &config);
        Self::create_with_storage(root, levels, Box::new(storage), config)
    }

    /// Like [`DataSystem::create_with_config`], persisting through `storage`.
    pub fn create_with_storage<I, S>(
        root: impl AsRef<Path>,
        levels: I,
        storage: Box<dyn IndexStorage>,
        config: DataSystemsConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let root = checked_root(root.as_ref())?;
        let hierarchy = Hierarchy::new(levels)?;

        let structure = if storage.exists() {
            let document = storage.load()?;
            ensure_same_hierarchy(&root, &hierarchy, &document.hierarchy)?;
            debug!(root = %root.display(), "Attached to existing data system");
            document.structure
        } else {
            if !root.is_dir() {
                fs::create_dir(&root)?;
            }
            storage.save(&IndexDocument::new(hierarchy.clone()))?;
            info!(
                root = %root.display(),
                hierarchy = ?hierarchy.levels(),
                "Created data system"
            );
            Structure::new()
        };

        Ok(Self {
            root,
            hierarchy,
            structure,
            storage,
            config,
        })
    }

    /// Open an existing data system, taking its hierarchy from the index document.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(root, DataSystemsConfig::default())
    }

    pub fn open_with_config(root: impl AsRef<Path>, config: DataSystemsConfig) -> Result<Self> {
        let root = checked_root(root.as_ref())?;
        let storage = default_storage(&root, &config);
        Self::open_with_storage(root, Box::new(storage), config)
    }

    pub fn open_with_storage(
        root: impl AsRef<Path>,
        storage: Box<dyn IndexStorage>,
        config: DataSystemsConfig,
    ) -> Result<Self> {
        let root = checked_root(root.as_ref())?;
        if !storage.exists() {
            return Err(DataSystemError::NotASystem(root));
        }
        let IndexDocument {
            hierarchy,
            structure,
        } = storage.load()?;
        info!(
            root = %root.display(),
            entries = structure.entry_count(),
            "Opened data system"
        );
        Ok(Self {
            root,
            hierarchy,
            structure,
            storage,
            config,
        })
    }

    /// Whether `root` holds an index document under the default filename.
    pub fn is_system(root: impl AsRef<Path>) -> bool {
        Self::is_system_with_config(root, &DataSystemsConfig::default())
    }

    pub fn is_system_with_config(root: impl AsRef<Path>, config: &DataSystemsConfig) -> bool {
        root.as_ref().join(&config.index.file_name).is_file()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn config(&self) -> &DataSystemsConfig {
        &self.config
    }

    /// The in-memory structure as of the last write or reload.
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Build a full-depth entry path. Does not touch the filesystem.
    pub fn name(&self, args: &[NameArg]) -> Result<PathBuf> {
        name(&self.root, &self.hierarchy, args)
    }

    /// Step-by-step alternative to [`DataSystem::name`].
    pub fn namer(&self) -> Namer<'_> {
        Namer::new(&self.root, &self.hierarchy)
    }

    /// Register `path` with `schema`, merging keys into any existing entry.
    ///
    /// `path` is relative to the root or absolute beneath it, and may stop
    /// short of the full hierarchy depth. The document is re-read before the
    /// merge and rewritten as a whole.
    pub fn add(&mut self, path: impl AsRef<Path>, schema: Schema) -> Result<()> {
        let segments = self.entry_segments(path.as_ref())?;

        let mut document = self.storage.load()?;
        ensure_same_hierarchy(&self.root, &self.hierarchy, &document.hierarchy)?;
        document.structure.upsert(&segments, schema)?;
        self.storage.save(&document)?;
        self.structure = document.structure;

        debug!(entry = %segments.join("/"), "Added entry");
        Ok(())
    }

    /// Re-read the structure from the index document.
    pub fn reload(&mut self) -> Result<()> {
        let document = self.storage.load()?;
        ensure_same_hierarchy(&self.root, &self.hierarchy, &document.hierarchy)?;
        self.structure = document.structure;
        debug!(entries = self.structure.entry_count(), "Reloaded structure");
        Ok(())
    }

    /// Every entry, depth first in stored order.
    pub fn iter_entries(&self) -> Entries<'_> {
        self.structure.entries()
    }

    /// Entries whose coordinates match every filter.
    pub fn iter_filter(&self, filters: &Filters) -> Filtered<'_> {
        Filtered::new(&self.structure, &self.hierarchy, filters)
    }

    /// Filtered entries whose schema contains `key`.
    pub fn find(&self, key: &str, filters: &Filters) -> Find<'_> {
        Find::new(&self.structure, &self.hierarchy, key, filters)
    }

    pub(crate) fn owns_path(&self, candidate: &Path) -> bool {
        self.storage.owns(candidate)
    }

    fn entry_segments(&self, path: &Path) -> Result<Vec<String>> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.root).map_err(|_| {
                DataSystemError::Argument(format!(
                    "path {} is not under root {}",
                    path.display(),
                    self.root.display()
                ))
            })?
        } else {
            path
        };

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment.to_str().ok_or_else(|| {
                        DataSystemError::Argument(format!(
                            "non UTF-8 segment in {}",
                            relative.display()
                        ))
                    })?;
                    segments.push(segment.to_string());
                }
                Component::CurDir => {}
                _ => {
                    return Err(DataSystemError::Argument(format!(
                        "entry path must stay under the root: {}",
                        path.display()
                    )))
                }
            }
        }

        if segments.is_empty() || segments.len() > self.hierarchy.len() {
            return Err(DataSystemError::Argument(format!(
                "entry path {} has {} segment(s); hierarchy allows 1 to {}",
                path.display(),
                segments.len(),
                self.hierarchy.len()
            )));
        }
        Ok(segments)
    }
}

fn checked_root(root: &Path) -> Result<PathBuf> {
    let root = dunce::simplified(root).to_path_buf();
    if !root.is_absolute() {
        return Err(DataSystemError::Precondition(format!(
            "root must be an absolute path: {}",
            root.display()
        )));
    }
    match root.parent() {
        Some(parent) if parent.is_dir() => Ok(root),
        Some(parent) => Err(DataSystemError::Precondition(format!(
            "parent directory does not exist: {}",
            parent.display()
        ))),
        None => Err(DataSystemError::Precondition(format!(
            "root has no parent directory: {}",
            root.display()
        ))),
    }
}

fn default_storage(root: &Path, config: &DataSystemsConfig) -> JsonFileStorage {
    JsonFileStorage::new(root.join(&config.index.file_name), config.index.atomic_write)
}

fn ensure_same_hierarchy(root: &Path, given: &Hierarchy, found: &Hierarchy) -> Result<()> {
    if given == found {
        return Ok(());
    }
    Err(DataSystemError::HierarchyMismatch {
        root: root.to_path_buf(),
        given: given.levels().to_vec(),
        found: found.levels().to_vec(),
    })
}
