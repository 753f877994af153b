//! Collaborator endpoint configuration.

use serde::Deserialize;
use std::time::Duration;

use super::ConfigError;

/// Design oracle endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8090".to_string(),
            timeout_secs: 30,
            api_key: None,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("oracle.base_url", "must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("oracle.timeout_secs", "must be > 0"));
        }
        Ok(())
    }
}

/// Inference collaborator endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8091".to_string(),
            timeout_secs: 300,
            api_key: None,
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid(
                "inference.base_url",
                "must not be empty",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "inference.timeout_secs",
                "must be > 0",
            ));
        }
        Ok(())
    }
}
