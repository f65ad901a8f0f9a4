//! Read-only reference lookup tables
//!
//! Dex records and competitive-usage statistics arrive as independently
//! authored JSON objects whose keys disagree on formatting. Every raw key is
//! normalized once at build time; queries normalize the incoming slug and hit
//! the prebuilt map. Records are opaque to the core and passed through
//! verbatim. Tables are immutable after startup, so request-time access needs
//! no synchronization.

use std::collections::HashMap;

use serde_json::Value;

use crate::normalize::normalize_key;
use crate::{Error, Result};

/// Immutable map from normalized key to an opaque JSON record.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    records: HashMap<String, Value>,
}

impl LookupTable {
    /// Build a table by normalizing every raw key of `source`.
    ///
    /// Raw keys that collapse to the same normalized key shadow each other,
    /// last write wins in source iteration order.
    pub fn from_value(source: Value) -> Result<Self> {
        let obj = match source {
            Value::Object(map) => map,
            other => {
                return Err(Error::Schema(format!(
                    "expected a JSON object of records, got {}",
                    type_name(&other)
                )))
            }
        };

        let mut records = HashMap::with_capacity(obj.len());
        for (raw_key, record) in obj {
            records.insert(normalize_key(&raw_key), record);
        }
        Ok(Self { records })
    }

    /// Create an empty table, used when an optional dataset is absent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize `raw_slug` and return the matching record, if any.
    ///
    /// A miss is an expected outcome, not a fault; nothing is mutated.
    pub fn get(&self, raw_slug: &str) -> Option<&Value> {
        self.records.get(&normalize_key(raw_slug))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
