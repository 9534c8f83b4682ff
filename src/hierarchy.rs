//! Hierarchy declaration and value sanitization.
//!
//! A hierarchy is the ordered list of level names that every entry path
//! must follow. Values compared against a level (path segments, filter
//! values, schema keys) always pass through [`sanitize`] first.

use crate::error::{DataSystemError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Normalize a hierarchy value.
///
/// Drops every character outside `[A-Za-z0-9-]`, trims, and lower-cases.
/// Idempotent: `sanitize(&sanitize(s)) == sanitize(s)`.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .trim()
        .to_ascii_lowercase()
}

/// Ordered, unique level names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Hierarchy {
    levels: Vec<String>,
}

impl Hierarchy {
    pub fn new<I, S>(levels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let levels: Vec<String> = levels.into_iter().map(Into::into).collect();
        if levels.is_empty() {
            return Err(DataSystemError::InvalidHierarchy(
                "hierarchy must have at least one level".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for level in &levels {
            if level.is_empty() {
                return Err(DataSystemError::InvalidHierarchy(
                    "level names must not be empty".to_string(),
                ));
            }
            if !seen.insert(level.as_str()) {
                return Err(DataSystemError::InvalidHierarchy(format!(
                    "duplicate level name: {}",
                    level
                )));
            }
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level(&self, index: usize) -> Option<&str> {
        self.levels.get(index).map(String::as_str)
    }

    pub fn position(&self, level: &str) -> Option<usize> {
        self.levels.iter().position(|l| l == level)
    }
}

impl TryFrom<Vec<String>> for Hierarchy {
    type Error = DataSystemError;

    fn try_from(levels: Vec<String>) -> Result<Self> {
        Hierarchy::new(levels)
    }
}

impl From<Hierarchy> for Vec<String> {
    fn from(hierarchy: Hierarchy) -> Self {
        hierarchy.levels
    }
}

impl PartialEq<[&str]> for Hierarchy {
    fn eq(&self, other: &[&str]) -> bool {
        self.levels.len() == other.len() && self.levels.iter().zip(other).all(|(a, b)| a == b)
    }
}
