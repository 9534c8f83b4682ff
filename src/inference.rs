//! Structure Inference
//!
//! Populates a data system from files already on disk. Each path matching a
//! glob pattern under the root is placed in the hierarchy by its relative
//! path, given a schema by a [`SchemaProvider`], and added as an entry.
//! Paths whose depth cannot be reconciled with the hierarchy are skipped and
//! reported, as are unreadable paths below the root. A failing schema
//! provider aborts the scan.

use crate::error::{DataSystemError, Result, SchemaError};
use crate::hierarchy::sanitize;
use crate::naming::NameArg;
use crate::system::DataSystem;
use crate::types::Schema;
use globset::GlobBuilder;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Computes the schema recorded for a matched path.
pub trait SchemaProvider {
    fn compute_schema(&mut self, path: &Path) -> std::result::Result<Schema, SchemaError>;
}

impl<F, E> SchemaProvider for F
where
    F: FnMut(&Path) -> std::result::Result<Schema, E>,
    E: Into<SchemaError>,
{
    fn compute_schema(&mut self, path: &Path) -> std::result::Result<Schema, SchemaError> {
        self(path).map_err(Into::into)
    }
}

/// A matched path that could not be placed in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    /// 1-based position in the sorted match list
    pub index: usize,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of one [`DataSystem::infer_structure`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceReport {
    pub matched: usize,
    /// Entry paths written, absolute, in processing order
    pub added: Vec<PathBuf>,
    pub skipped: Vec<SkippedPath>,
}

/// Hierarchy coordinates of `path`, taken from its components relative to `root`.
pub fn infer_keys(root: &Path, path: &Path) -> Result<Vec<String>> {
    let relative = if path.is_absolute() {
        path.strip_prefix(root).map_err(|_| {
            DataSystemError::Argument(format!(
                "path {} is outside root {}",
                path.display(),
                root.display()
            ))
        })?
    } else {
        path
    };

    relative
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|component| match component {
            Component::Normal(segment) => segment.to_str().map(str::to_string).ok_or_else(|| {
                DataSystemError::Argument(format!(
                    "non UTF-8 segment in {}",
                    relative.display()
                ))
            }),
            other => Err(DataSystemError::Argument(format!(
                "unsupported component {:?} in {}",
                other,
                relative.display()
            ))),
        })
        .collect()
}

/// Paths under `root` matching `pattern`, sorted.
///
/// A pattern not already starting with `**/` is matched at any depth.
pub(crate) fn matching_paths(
    root: &Path,
    pattern: &str,
    follow_links: bool,
    exclude: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>> {
    let anchored = if pattern.starts_with("**/") {
        pattern.to_string()
    } else {
        format!("**/{}", pattern.trim_start_matches('/'))
    };
    let matcher = GlobBuilder::new(&anchored)
        .literal_separator(true)
        .build()
        .map_err(|e| DataSystemError::Pattern(format!("{}: {}", pattern, e)))?
        .compile_matcher();

    let mut matched = Vec::new();
    for item in WalkDir::new(root).follow_links(follow_links).min_depth(1) {
        let item = match item {
            Ok(item) => item,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!(
                    path = ?e.path(),
                    error = %e,
                    "Skipping unreadable path during scan"
                );
                continue;
            }
        };
        if exclude(item.path()) {
            continue;
        }
        let relative = item
            .path()
            .strip_prefix(root)
            .map_err(|e| DataSystemError::Argument(e.to_string()))?;
        if matcher.is_match(relative) {
            matched.push(item.into_path());
        }
    }
    matched.sort();
    Ok(matched)
}

/// Coordinates of a scanned path, trimmed to fit a hierarchy of `levels` levels.
///
/// More keys than levels drops the last (the filename). What remains must
/// match `levels` exactly. Every failure here is a [`DataSystemError::HierarchyFit`].
pub(crate) fn fit_coordinates(root: &Path, path: &Path, levels: usize) -> Result<Vec<String>> {
    let fit_error = |reason: String| DataSystemError::HierarchyFit {
        path: path.to_path_buf(),
        reason,
    };
    let mut keys = infer_keys(root, path).map_err(|e| match e {
        DataSystemError::Argument(reason) => fit_error(reason),
        other => other,
    })?;

    if keys.len() > levels {
        keys.pop();
    }
    if keys.len() != levels {
        return Err(fit_error(format!(
            "{} coordinate(s) cannot fill {} level(s)",
            keys.len(),
            levels
        )));
    }
    if let Some(empty) = keys.iter().find(|k| sanitize(k).is_empty()) {
        return Err(fit_error(format!(
            "segment {:?} is empty after sanitization",
            empty
        )));
    }
    Ok(keys)
}

impl DataSystem {
    /// Hierarchy coordinates of `path` relative to this root.
    pub fn infer_keys(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        infer_keys(self.root(), path.as_ref())
    }

    /// Scan the root for `pattern` and add an entry per fitting match.
    ///
    /// With `cut_levels > 0` the entry is the `cut_levels`-th ancestor of the
    /// named path, so one entry can stand for a folder of files. Paths that
    /// cannot be placed, and unreadable paths below the root, are skipped.
    pub fn infer_structure<P: SchemaProvider>(
        &mut self,
        pattern: &str,
        mut provider: P,
        cut_levels: usize,
    ) -> Result<InferenceReport> {
        let levels = self.hierarchy().len();
        if cut_levels >= levels {
            return Err(DataSystemError::Argument(format!(
                "cut_levels must be less than the hierarchy length: {}>={}",
                cut_levels, levels
            )));
        }
        let filler = self.config().inference.filler.clone();
        if sanitize(&filler).is_empty() {
            return Err(DataSystemError::Argument(format!(
                "filler {:?} is empty after sanitization",
                filler
            )));
        }

        let matches = matching_paths(
            self.root(),
            pattern,
            self.config().inference.follow_links,
            |candidate| self.owns_path(candidate),
        )?;
        let mut report = InferenceReport {
            matched: matches.len(),
            ..InferenceReport::default()
        };

        for (i, path) in matches.iter().enumerate() {
            let index = i + 1;
            debug!(index, path = %path.display(), "Inferring entry");

            let mut coordinates = match fit_coordinates(self.root(), path, levels) {
                Ok(coordinates) => coordinates,
                Err(DataSystemError::HierarchyFit { path, reason }) => {
                    warn!(index, path = %path.display(), %reason, "Skipping path");
                    report.skipped.push(SkippedPath {
                        index,
                        path,
                        reason,
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let schema = provider
                .compute_schema(path)
                .map_err(|source| DataSystemError::SchemaComputation {
                    path: path.clone(),
                    source,
                })?;

            let entry_path = if cut_levels == 0 {
                self.name(&to_args(&coordinates))?
            } else {
                coordinates.resize(levels, filler.clone());
                let full = self.name(&to_args(&coordinates))?;
                full.ancestors()
                    .nth(cut_levels)
                    .map(Path::to_path_buf)
                    .ok_or_else(|| {
                        DataSystemError::Argument(format!(
                            "cannot cut {} level(s) from {}",
                            cut_levels,
                            full.display()
                        ))
                    })?
            };

            self.add(&entry_path, schema)?;
            report.added.push(entry_path);
        }

        info!(
            pattern,
            matched = report.matched,
            added = report.added.len(),
            skipped = report.skipped.len(),
            "Structure inference completed"
        );
        Ok(report)
    }
}

fn to_args(coordinates: &[String]) -> Vec<NameArg> {
    coordinates.iter().cloned().map(NameArg::Positional).collect()
}
