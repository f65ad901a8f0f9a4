//! Classifier collaborator
//!
//! The model itself runs out of process. This module owns the seam: the
//! `ImageClassifier` trait, camera frame preprocessing, and the HTTP client
//! for the model service.

pub mod preprocess;
pub mod remote;

pub use preprocess::decode_frame;
pub use remote::RemoteClassifier;

use fielddex_common::Result;

/// A classifier mapping a preprocessed input tensor to a probability
/// distribution over the label set.
///
/// The distribution is indexed by class (index = class, value =
/// probability). Values are expected to sum to roughly 1 but this is not
/// enforced.
#[async_trait::async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, input: &[f32]) -> Result<Vec<f32>>;
}
