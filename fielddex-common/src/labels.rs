//! Label registry: classifier output index → canonical species name
//!
//! The classifier's output range is fixed at training time, but the label
//! schema ships as a separately maintained JSON file that has historically
//! appeared in two orientations. Both are recognized; the orientation is
//! detected explicitly and validated once at startup, so a regressed file
//! fails the process fast instead of failing per request.

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Name returned for indices outside the registry's domain.
pub const FALLBACK_LABEL: &str = "Unknown";

/// The two recognized label-schema shapes.
///
/// Detection prefers index→name when a file satisfies both (all-numeric keys
/// with string values could in principle also parse as name→index).
#[derive(Debug)]
enum LabelSchema {
    /// `{"0": "bulbasaur", "1": "ivysaur", ...}`
    IndexToName(Vec<(usize, String)>),
    /// `{"bulbasaur": 0, "ivysaur": 1, ...}`
    NameToIndex(Vec<(String, usize)>),
}

impl LabelSchema {
    fn detect(obj: &Map<String, Value>) -> Result<Self> {
        if obj.keys().all(|k| k.parse::<usize>().is_ok()) && obj.values().all(Value::is_string)
        {
            let pairs = obj
                .iter()
                .filter_map(|(k, v)| Some((k.parse().ok()?, v.as_str()?.to_string())))
                .collect();
            return Ok(LabelSchema::IndexToName(pairs));
        }

        if obj.values().all(|v| v.as_u64().is_some()) {
            let pairs = obj
                .iter()
                .filter_map(|(k, v)| Some((k.clone(), v.as_u64()? as usize)))
                .collect();
            return Ok(LabelSchema::NameToIndex(pairs));
        }

        Err(Error::Schema(
            "label schema matches neither index→name nor name→index orientation".to_string(),
        ))
    }
}

/// Immutable mapping from classifier output index to species name.
///
/// Indices may be sparse; lookups outside the domain resolve to
/// [`FALLBACK_LABEL`] rather than faulting.
#[derive(Debug, Clone)]
pub struct LabelMap {
    names: std::collections::HashMap<usize, String>,
}

impl LabelMap {
    /// Build the registry from a raw label schema.
    ///
    /// Fails with [`Error::Schema`] when neither orientation validates; the
    /// caller is expected to abort startup on that error.
    pub fn from_value(raw: &Value) -> Result<Self> {
        let obj = raw
            .as_object()
            .ok_or_else(|| Error::Schema("label schema is not a JSON object".to_string()))?;

        let names = match LabelSchema::detect(obj)? {
            LabelSchema::IndexToName(pairs) => pairs.into_iter().collect(),
            LabelSchema::NameToIndex(pairs) => {
                pairs.into_iter().map(|(name, idx)| (idx, name)).collect()
            }
        };

        Ok(Self { names })
    }

    /// Resolve a classifier output index to its species name.
    ///
    /// Total over all indices: unknown indices yield [`FALLBACK_LABEL`].
    pub fn resolve(&self, index: usize) -> &str {
        self.names
            .get(&index)
            .map(String::as_str)
            .unwrap_or(FALLBACK_LABEL)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
