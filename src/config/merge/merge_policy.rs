//! Built-in defaults layered beneath every other source.

use crate::config::{DEFAULT_FILLER, DEFAULT_INDEX_FILE_NAME};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("index.file_name", DEFAULT_INDEX_FILE_NAME)?
        .set_default("index.atomic_write", true)?
        .set_default("inference.filler", DEFAULT_FILLER)?
        .set_default("inference.follow_links", false)
}
