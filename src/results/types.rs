//! Result type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field/value pairs of one sub-record inside a repeated field
pub type FieldMapping = serde_json::Map<String, Value>;

/// Value of a top-level field in a raw result document
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// String scalar
    Text(String),
    /// Integer scalar
    Integer(i64),
    /// Repeated sequence of sub-records
    Composite(Vec<FieldMapping>),
    /// Anything else: booleans, floats, nulls, bare objects, scalar lists
    Unsupported,
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Number(n) => n.as_i64().map(Self::Integer).unwrap_or(Self::Unsupported),
            Value::Array(items) => {
                let mut records = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(map) => records.push(map),
                        _ => return Self::Unsupported,
                    }
                }
                Self::Composite(records)
            }
            Value::Bool(_) | Value::Null | Value::Object(_) => Self::Unsupported,
        }
    }
}

/// One matched document as returned by the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    /// Document id
    pub id: String,
    /// Full resource name of the document
    pub name: String,
    /// Top-level fields in provider order
    pub fields: Vec<(String, FieldValue)>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Build a document from the provider's derived struct data
    pub fn from_struct(id: impl Into<String>, name: impl Into<String>, data: FieldMapping) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: data
                .into_iter()
                .map(|(key, value)| (key, FieldValue::from(value)))
                .collect(),
        }
    }

    /// Add a field
    pub fn with_field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((key.into(), value));
        self
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Value of a normalized field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    Text(String),
    Integer(i64),
    Nested(FieldMapping),
}

/// Flat, serialization-ready form of one raw document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedResult {
    pub fields: BTreeMap<String, NormalizedValue>,
}

impl NormalizedResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: NormalizedValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&NormalizedValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Text of a scalar string field
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(NormalizedValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// String member of a nested (flattened) field, e.g. `snippets.snippet`
    pub fn nested_text(&self, key: &str, member: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(NormalizedValue::Nested(map)) => map.get(member).and_then(|v| v.as_str()),
            _ => None,
        }
    }
}
