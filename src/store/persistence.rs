//! JSON file backend for the index document.

use super::{IndexDocument, IndexStorage};
use crate::error::{DataSystemError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Stores the index document as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    atomic_write: bool,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>, atomic_write: bool) -> Self {
        Self {
            path: path.into(),
            atomic_write,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    fn write_atomic(&self, content: &[u8]) -> Result<()> {
        let parent = self.path.parent().ok_or_else(|| {
            DataSystemError::Precondition(format!(
                "index document has no parent directory: {}",
                self.path.display()
            ))
        })?;
        let file_name = self.file_name().ok_or_else(|| {
            DataSystemError::Precondition(format!(
                "invalid index document filename: {}",
                self.path.display()
            ))
        })?;
        let tmp_path = parent.join(format!(
            ".{}.tmp.{}.{}",
            file_name,
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        {
            let mut tmp = fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&tmp_path)?;
            tmp.write_all(content)?;
            tmp.sync_all()?;
        }

        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(DataSystemError::from(err));
        }

        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
        Ok(())
    }
}

impl IndexStorage for JsonFileStorage {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<IndexDocument> {
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            DataSystemError::Malformed(format!("{}: {}", self.path.display(), e))
        })
    }

    fn save(&self, document: &IndexDocument) -> Result<()> {
        let mut content = serde_json::to_vec_pretty(document)?;
        content.push(b'\n');
        if self.atomic_write {
            self.write_atomic(&content)
        } else {
            fs::write(&self.path, content)?;
            Ok(())
        }
    }

    /// The document itself or one of its temporary siblings.
    fn owns(&self, candidate: &Path) -> bool {
        if candidate == self.path {
            return true;
        }
        match (candidate.parent(), self.path.parent(), self.file_name()) {
            (Some(a), Some(b), Some(name)) if a == b => candidate
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&format!(".{}.tmp.", name)))
                .unwrap_or(false),
            _ => false,
        }
    }
}
