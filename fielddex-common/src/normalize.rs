//! Key normalization for cross-dataset joins
//!
//! The reference datasets are authored independently and disagree on slug
//! formatting: the same species may appear as "Mr. Mime", "mr-mime", or
//! "MRMIME". Every lookup table and every per-request slug goes through
//! `normalize_key` so those spellings land on the same entry.

/// Canonicalize a free-form slug into its comparable form.
///
/// Lower-cases the input and removes every character outside `[a-z0-9]`.
/// Removal (not substitution) means separator runs cannot leave artifacts
/// behind. Pure and deterministic with no locale dependence; idempotent.
pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
