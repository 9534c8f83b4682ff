//! Integration tests for the datasystems index

mod inference_scan;
mod query_filters;
mod store_roundtrip;

use datasystems::Schema;
use std::path::PathBuf;
use tempfile::TempDir;

/// Fresh, not yet existing root inside a temporary directory.
pub fn fresh_root() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("system");
    (temp_dir, root)
}

pub fn schema(value: serde_json::Value) -> Schema {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("schema fixture must be an object, got {}", other),
    }
}
