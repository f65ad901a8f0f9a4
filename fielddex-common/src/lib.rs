//! # FieldDex Common Library
//!
//! Shared core for the FieldDex services including:
//! - Label registry (classifier output index → canonical species name)
//! - Key normalization for cross-dataset joins
//! - Per-client prediction stability tracking
//! - Read-only reference lookup tables
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod labels;
pub mod lookup;
pub mod normalize;
pub mod stability;

pub use error::{Error, Result};
pub use labels::{LabelMap, FALLBACK_LABEL};
pub use lookup::LookupTable;
pub use normalize::normalize_key;
pub use stability::{StabilityTracker, CONFIDENCE_FLOOR, STABLE_WINDOW};
