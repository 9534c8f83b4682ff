//! Core types shared across the datasystems modules.

use std::collections::BTreeMap;

/// Schema: arbitrary key/value metadata attached to an entry
pub type Schema = serde_json::Map<String, serde_json::Value>;

/// Filters: hierarchy level name -> required value
pub type Filters = BTreeMap<String, String>;

/// Build a filter map from level/value pairs.
pub fn filters<I, K, V>(pairs: I) -> Filters
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
