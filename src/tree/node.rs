//! Structure node types and their document encoding

use crate::types::Schema;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const PATH_KEY: &str = "path";
const SCHEMA_KEY: &str = "schema";

/// Leaf record: root-relative path plus its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Segments joined by `/`
    pub path: String,
    pub schema: Schema,
}

impl Entry {
    /// Path segments in hierarchy order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

/// Structure node
///
/// Encoded as a plain JSON object of children, or as `{"path", "schema"}` for
/// a leaf. A leaf never carries children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Intermediate(BTreeMap<String, Node>),
    Leaf(Entry),
}

impl Node {
    pub fn empty() -> Self {
        Node::Intermediate(BTreeMap::new())
    }

    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            Node::Leaf(entry) => Some(entry),
            Node::Intermediate(_) => None,
        }
    }

    pub fn children(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Intermediate(children) => Some(children),
            Node::Leaf(_) => None,
        }
    }

    pub(crate) fn from_object(mut object: Map<String, Value>) -> Result<Self, String> {
        if is_leaf_shape(&object) {
            if let (Some(Value::String(path)), Some(Value::Object(schema))) =
                (object.remove(PATH_KEY), object.remove(SCHEMA_KEY))
            {
                if let Some(extra) = object.keys().next() {
                    return Err(format!(
                        "entry {} also has child {:?}; leaves cannot have children",
                        path, extra
                    ));
                }
                return Ok(Node::Leaf(Entry { path, schema }));
            }
        }

        children_from_object(object).map(Node::Intermediate)
    }
}

pub(crate) fn children_from_object(
    object: Map<String, Value>,
) -> Result<BTreeMap<String, Node>, String> {
    let mut children = BTreeMap::new();
    for (segment, value) in object {
        match value {
            Value::Object(child) => {
                let node = Node::from_object(child).map_err(|e| format!("{}/{}", segment, e))?;
                children.insert(segment, node);
            }
            other => {
                return Err(format!(
                    "node {:?} must be an object, found {}",
                    segment,
                    value_kind(&other)
                ));
            }
        }
    }
    Ok(children)
}

fn is_leaf_shape(object: &Map<String, Value>) -> bool {
    matches!(object.get(PATH_KEY), Some(Value::String(_)))
        && matches!(object.get(SCHEMA_KEY), Some(Value::Object(_)))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(entry) => entry.serialize(serializer),
            Node::Intermediate(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (segment, child) in children {
                    map.serialize_entry(segment, child)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Node::from_object(object).map_err(de::Error::custom)
    }
}
