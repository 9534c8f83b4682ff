//! Hierarchy-conformant path construction.
//!
//! Positional values fill levels left to right; a named value must name the
//! next unfilled level. [`Namer`] tracks the current level index explicitly
//! so ordering mistakes are reported at the step that causes them.

use crate::error::{DataSystemError, Result};
use crate::hierarchy::{sanitize, Hierarchy};
use std::path::{Path, PathBuf};

/// One argument to [`crate::DataSystem::name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameArg {
    Positional(String),
    Named { level: String, value: String },
}

impl NameArg {
    pub fn named(level: impl Into<String>, value: impl Into<String>) -> Self {
        NameArg::Named {
            level: level.into(),
            value: value.into(),
        }
    }
}

impl From<&str> for NameArg {
    fn from(value: &str) -> Self {
        NameArg::Positional(value.to_string())
    }
}

impl From<String> for NameArg {
    fn from(value: String) -> Self {
        NameArg::Positional(value)
    }
}

impl From<(&str, &str)> for NameArg {
    fn from((level, value): (&str, &str)) -> Self {
        NameArg::named(level, value)
    }
}

/// Builder that assembles an entry path one level at a time.
#[derive(Debug)]
pub struct Namer<'a> {
    root: &'a Path,
    hierarchy: &'a Hierarchy,
    segments: Vec<String>,
    current_level_index: usize,
    seen_named: bool,
    error: Option<DataSystemError>,
}

impl<'a> Namer<'a> {
    pub fn new(root: &'a Path, hierarchy: &'a Hierarchy) -> Self {
        Self {
            root,
            hierarchy,
            segments: Vec::with_capacity(hierarchy.len()),
            current_level_index: 0,
            seen_named: false,
            error: None,
        }
    }

    /// Fill the next level positionally.
    pub fn value(mut self, value: impl AsRef<str>) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.push_positional(value.as_ref()) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Fill the next level, asserting its name.
    pub fn level(mut self, level: &str, value: impl AsRef<str>) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.push_named(level, value.as_ref()) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Apply a single [`NameArg`].
    pub fn arg(self, arg: &NameArg) -> Self {
        match arg {
            NameArg::Positional(value) => self.value(value),
            NameArg::Named { level, value } => self.level(level, value),
        }
    }

    /// Join the collected segments onto the root.
    pub fn finish(self) -> Result<PathBuf> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.segments.len() != self.hierarchy.len() {
            return Err(DataSystemError::Argument(format!(
                "argument count must exactly match hierarchy: {}!={}",
                self.segments.len(),
                self.hierarchy.len()
            )));
        }
        let mut path = self.root.to_path_buf();
        for segment in &self.segments {
            path.push(segment);
        }
        Ok(path)
    }

    fn push_positional(&mut self, value: &str) -> Result<()> {
        if self.seen_named {
            return Err(DataSystemError::Argument(format!(
                "positional value {:?} after named values",
                value
            )));
        }
        self.push_segment(value)
    }

    fn push_named(&mut self, level: &str, value: &str) -> Result<()> {
        self.seen_named = true;
        let expected = self.hierarchy.level(self.current_level_index).ok_or_else(|| {
            DataSystemError::Argument(format!(
                "too many arguments: level {:?} given after all {} levels were filled",
                level,
                self.hierarchy.len()
            ))
        })?;
        if expected != level {
            return Err(DataSystemError::Argument(format!(
                "invalid argument order: expected level {:?}, got {:?}",
                expected, level
            )));
        }
        self.push_segment(value)
    }

    fn push_segment(&mut self, value: &str) -> Result<()> {
        if self.current_level_index >= self.hierarchy.len() {
            return Err(DataSystemError::Argument(format!(
                "too many arguments: hierarchy has {} levels",
                self.hierarchy.len()
            )));
        }
        let segment = sanitize(value);
        if segment.is_empty() {
            return Err(DataSystemError::Argument(format!(
                "value {:?} for level {:?} is empty after sanitization",
                value,
                self.hierarchy.level(self.current_level_index).unwrap_or_default()
            )));
        }
        self.segments.push(segment);
        self.current_level_index += 1;
        Ok(())
    }
}

/// Build an entry path from a mixed argument list.
pub fn name(root: &Path, hierarchy: &Hierarchy, args: &[NameArg]) -> Result<PathBuf> {
    args.iter()
        .fold(Namer::new(root, hierarchy), |namer, arg| namer.arg(arg))
        .finish()
}
