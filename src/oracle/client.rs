//! HTTP client for the selector-inference service
//!
//! The service receives `POST {"html": <chunk>}` and answers
//! `{"result_text": <completion>}`. Any transport error, timeout, non-2xx
//! status, or undecodable body is reported as `InferenceResult::Unavailable`;
//! nothing here is ever fatal to a page. No retries are attempted.

use crate::config::OracleConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of one inference call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceResult {
    /// The oracle answered; the raw free-text completion
    Completed(String),

    /// The oracle could not be used for this chunk
    Unavailable(String),
}

/// A text-in/text-out selector oracle
#[async_trait]
pub trait SelectorOracle: Send + Sync {
    /// Sends one chunk of markup and returns the oracle's raw response
    async fn infer(&self, chunk: &str) -> InferenceResult;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    result_text: String,
}

/// Selector oracle reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: Client,
    endpoint: String,
}

impl HttpOracle {
    /// Creates an oracle client with the given endpoint and request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Creates an oracle client from configuration
    pub fn from_config(config: &OracleConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.endpoint.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SelectorOracle for HttpOracle {
    async fn infer(&self, chunk: &str) -> InferenceResult {
        let response = match self
            .client
            .post(&self.endpoint)
            .json(&InferenceRequest { html: chunk })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    format!("Could not connect to oracle at {}", self.endpoint)
                } else {
                    e.to_string()
                };
                tracing::warn!("Oracle call failed: {}", reason);
                return InferenceResult::Unavailable(reason);
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Oracle returned HTTP {}", status.as_u16());
            return InferenceResult::Unavailable(format!("HTTP {}", status.as_u16()));
        }

        match response.json::<InferenceResponse>().await {
            Ok(body) => InferenceResult::Completed(body.result_text),
            Err(e) => {
                tracing::warn!("Oracle response could not be decoded: {}", e);
                InferenceResult::Unavailable(format!("Undecodable response: {}", e))
            }
        }
    }
}
