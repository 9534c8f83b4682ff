//! Error types for the datasystems crate.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataSystemError>;

/// Boxed error returned by schema providers.
pub type SchemaError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum DataSystemError {
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("invalid hierarchy for root={}: given={given:?}, found={found:?}", root.display())]
    HierarchyMismatch {
        root: PathBuf,
        given: Vec<String>,
        found: Vec<String>,
    },

    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("not a data system: {} has no index document", .0.display())]
    NotASystem(PathBuf),

    #[error("schema computation failed for {}: {source}", path.display())]
    SchemaComputation {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("failed to fit {} into hierarchy: {reason}", path.display())]
    HierarchyFit { path: PathBuf, reason: String },

    #[error("structure conflict: {0}")]
    StructureConflict(String),

    #[error("malformed index document: {0}")]
    Malformed(String),

    #[error("invalid pattern: {0}")]
    Pattern(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl DataSystemError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Precondition(_) => "PRECONDITION",
            Self::HierarchyMismatch { .. } => "HIERARCHY_MISMATCH",
            Self::InvalidHierarchy(_) => "INVALID_HIERARCHY",
            Self::Argument(_) => "ARGUMENT",
            Self::NotASystem(_) => "NOT_A_SYSTEM",
            Self::SchemaComputation { .. } => "SCHEMA_COMPUTATION",
            Self::HierarchyFit { .. } => "HIERARCHY_FIT",
            Self::StructureConflict(_) => "STRUCTURE_CONFLICT",
            Self::Malformed(_) => "MALFORMED_INDEX",
            Self::Pattern(_) => "INVALID_PATTERN",
            Self::Logging(_) => "LOGGING_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Walk(_) => "WALK_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}
