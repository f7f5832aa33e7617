use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw store record: an opaque identifier plus whatever field map the
/// backend returned. Field names and value shapes are not guaranteed to be
/// consistent across records; nothing past the workflow's normalizer may
/// depend on this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }
}
