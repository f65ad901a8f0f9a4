//! HTTP client for the external model service
//!
//! The model runs in a dedicated model server; each frame is scored with a
//! single JSON round trip. The request/response shape follows the common
//! predict protocol: `{"instances": [tensor]}` in, `{"predictions":
//! [distribution]}` out.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use fielddex_common::{Error, Result};

use super::ImageClassifier;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("fielddex/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct PredictBody<'a> {
    instances: [&'a [f32]; 1],
}

#[derive(Debug, Deserialize)]
struct PredictReply {
    predictions: Vec<Vec<f32>>,
}

/// Classifier backed by a remote model server
pub struct RemoteClassifier {
    http_client: reqwest::Client,
    endpoint: String,
}

impl RemoteClassifier {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Classifier(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait::async_trait]
impl ImageClassifier for RemoteClassifier {
    async fn classify(&self, input: &[f32]) -> Result<Vec<f32>> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&PredictBody { instances: [input] })
            .send()
            .await
            .map_err(|e| Error::Classifier(format!("inference request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Classifier(format!(
                "model service answered {}",
                status
            )));
        }

        let reply: PredictReply = response
            .json()
            .await
            .map_err(|e| Error::Classifier(format!("malformed model reply: {}", e)))?;

        reply
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| Error::Classifier("model reply carried no predictions".to_string()))
    }
}
