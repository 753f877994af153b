//! HTTP inference sampler client.
//!
//! Posts the refit request to the inference collaborator. Inference runs
//! once per session and may take a while, so the default timeout is
//! generous; every failure maps to `InferenceError` and the caller skips
//! reconciliation.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::ports::{InferenceError, InferenceReply, InferenceRequest, InferenceSampler};

/// Configuration for the HTTP inference sampler.
#[derive(Debug, Clone)]
pub struct InferenceHttpConfig {
    /// Base URL of the inference service.
    pub base_url: String,
    /// Bounded round-trip timeout; sampling is slow.
    pub timeout: Duration,
    /// Optional bearer token.
    api_key: Option<Secret<String>>,
}

impl InferenceHttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(300),
            api_key: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }
}

/// Inference sampler reached over HTTP.
pub struct HttpInferenceSampler {
    config: InferenceHttpConfig,
    client: Client,
}

impl HttpInferenceSampler {
    pub fn new(config: InferenceHttpConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::Unavailable(format!("failed to build client: {e}")))?;
        Ok(Self { config, client })
    }

    fn fit_url(&self) -> String {
        format!("{}/fit", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl InferenceSampler for HttpInferenceSampler {
    async fn fit(&self, request: &InferenceRequest) -> Result<InferenceReply, InferenceError> {
        let mut builder = self.client.post(self.fit_url()).json(request);
        if let Some(key) = self.config.api_key() {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| InferenceError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InferenceError::Unavailable(format!("failed to read reply: {e}")))?;

        if !status.is_success() {
            // The sampler ran and reported failure (non-convergence etc.)
            // vs. the service being down.
            if status.is_server_error() {
                return Err(InferenceError::SamplingFailed(format!(
                    "inference service returned {status}: {body}"
                )));
            }
            return Err(InferenceError::Unavailable(format!(
                "inference service returned {status}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| InferenceError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = InferenceHttpConfig::new("http://localhost:9100");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(config.api_key().is_none());
    }

    #[test]
    fn fit_url_normalizes_trailing_slash() {
        let sampler =
            HttpInferenceSampler::new(InferenceHttpConfig::new("http://localhost:9100/")).unwrap();
        assert_eq!(sampler.fit_url(), "http://localhost:9100/fit");
    }
}
