//! Long-term profile storage configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Where per-user profile files live and which user a plain run serves.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub base_dir: PathBuf,
    pub default_user: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./profiles"),
            default_user: "default_user".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_directory() {
        let config = ProfileConfig::default();
        assert_eq!(config.base_dir, PathBuf::from("./profiles"));
        assert_eq!(config.default_user, "default_user");
    }
}
