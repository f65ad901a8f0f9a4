//! Startup dataset loading
//!
//! Reads the label schema and both reference datasets from the data folder.
//! Everything is parsed and validated once here, before the server starts
//! accepting requests; a malformed label schema aborts startup rather than
//! failing per request.

use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use fielddex_common::{LabelMap, LookupTable, Result};

/// Label schema file: classifier output index ↔ species name
pub const LABELS_FILE: &str = "class_indices.json";

/// Species reference records keyed by slug
pub const DEX_FILE: &str = "dex_data.json";

/// Competitive-usage statistics keyed by slug (optional)
pub const USAGE_FILE: &str = "usage_data.json";

/// All reference data loaded at process start
pub struct ReferenceData {
    pub labels: LabelMap,
    pub dex: LookupTable,
    pub usage: LookupTable,
}

/// Load and validate every dataset in `data_folder`.
pub fn load(data_folder: &Path) -> Result<ReferenceData> {
    let labels = LabelMap::from_value(&read_json(&data_folder.join(LABELS_FILE))?)?;
    info!("{} labels loaded", labels.len());

    let dex = LookupTable::from_value(read_json(&data_folder.join(DEX_FILE))?)?;
    info!("{} dex entries loaded", dex.len());

    // Usage statistics are optional; classification works without them
    let usage_path = data_folder.join(USAGE_FILE);
    let usage = if usage_path.exists() {
        let raw = read_json(&usage_path)?;
        let raw_count = raw.as_object().map_or(0, |m| m.len());
        let table = LookupTable::from_value(raw)?;
        if table.len() < raw_count {
            warn!(
                "{} usage keys collapsed during normalization",
                raw_count - table.len()
            );
        }
        info!("{} usage entries after normalization", table.len());
        table
    } else {
        warn!(
            "{} not found, usage lookups will always miss",
            usage_path.display()
        );
        LookupTable::empty()
    };

    Ok(ReferenceData { labels, dex, usage })
}

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
