//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::DataSystemsConfig;
use crate::error::Result;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<DataSystemsConfig> {
        Ok(MergeService::load()?)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<DataSystemsConfig> {
        Ok(MergeService::load_from_file(path)?)
    }

    /// Create default configuration.
    pub fn default() -> DataSystemsConfig {
        DataSystemsConfig::default()
    }
}
