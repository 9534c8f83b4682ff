//! Configuration
//!
//! Settings for the index document, structure inference, and logging.
//! Loaded by [`ConfigLoader`] from defaults, an optional global TOML file,
//! and `DATASYSTEMS_*` environment variables.

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Default index document filename, written inside the root.
pub const DEFAULT_INDEX_FILE_NAME: &str = ".datasystems-config.json";

/// Default placeholder used to pad missing coordinates during inference.
pub const DEFAULT_FILLER: &str = "filler";

fn default_index_file_name() -> String {
    DEFAULT_INDEX_FILE_NAME.to_string()
}

fn default_filler() -> String {
    DEFAULT_FILLER.to_string()
}

fn default_true() -> bool {
    true
}

/// Index document settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Document filename inside the root
    #[serde(default = "default_index_file_name")]
    pub file_name: String,

    /// Write through a temporary sibling and rename over the target
    #[serde(default = "default_true")]
    pub atomic_write: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            file_name: default_index_file_name(),
            atomic_write: default_true(),
        }
    }
}

/// Structure inference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Placeholder for missing trailing coordinates when cutting levels
    #[serde(default = "default_filler")]
    pub filler: String,

    /// Follow symbolic links while scanning
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            filler: default_filler(),
            follow_links: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSystemsConfig {
    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
