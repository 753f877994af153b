//! HTTP design oracle client.
//!
//! Talks JSON to a design-generation service. Every transport or parse
//! problem maps onto `OracleError`; callers treat all of them as a
//! recoverable "design unavailable" signal.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::ports::{DesignOracle, DesignReply, DesignRequest, OracleError};

/// Configuration for the HTTP design oracle.
#[derive(Debug, Clone)]
pub struct OracleHttpConfig {
    /// Base URL of the design service.
    pub base_url: String,
    /// Bounded round-trip timeout.
    pub timeout: Duration,
    /// Optional bearer token.
    api_key: Option<Secret<String>>,
}

impl OracleHttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
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

/// Design oracle reached over HTTP.
pub struct HttpDesignOracle {
    config: OracleHttpConfig,
    client: Client,
}

impl HttpDesignOracle {
    pub fn new(config: OracleHttpConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Unreachable(format!("failed to build client: {e}")))?;
        Ok(Self { config, client })
    }

    fn design_url(&self) -> String {
        format!("{}/design", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl DesignOracle for HttpDesignOracle {
    async fn request_design(&self, request: &DesignRequest) -> Result<DesignReply, OracleError> {
        let mut builder = self.client.post(self.design_url()).json(request);
        if let Some(key) = self.config.api_key() {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout
            } else {
                OracleError::Unreachable(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OracleError::Unreachable(format!("failed to read reply: {e}")))?;

        if !status.is_success() {
            return Err(OracleError::Unreachable(format!(
                "design service returned {status}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| OracleError::Malformed(e.to_string()))
    }
}
