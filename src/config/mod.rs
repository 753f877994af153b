//! Application configuration.
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Values use the `COMPASS_` prefix with
//! `__` separating nested sections, e.g. `COMPASS_ENGINE__MAX_QUESTIONS=6`
//! or `COMPASS_ORACLE__BASE_URL=http://localhost:8090`.

mod collaborators;
mod engine;
mod error;
mod profile;

pub use collaborators::{InferenceConfig, OracleConfig};
pub use engine::EngineConfig;
pub use error::ConfigError;
pub use profile::ProfileConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Elicitation engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Design oracle endpoint.
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Inference collaborator endpoint.
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Long-term profile storage.
    #[serde(default)]
    pub profile: ProfileConfig,
}

impl AppConfig {
    /// Loads configuration from the environment (and a `.env` file when
    /// present). Every section has working defaults.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw = config::Config::builder()
            .add_source(config::Environment::with_prefix("COMPASS").separator("__"))
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let app: AppConfig = raw
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    /// Validates cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.oracle.validate()?;
        self.inference.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.max_questions, 8);
    }
}
