//! Elicitation engine tuning.

use serde::Deserialize;

use crate::domain::session::PhaseThresholds;

use super::ConfigError;

/// Knobs for the question loop and phase selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard cap on main questions per session.
    pub max_questions: usize,
    /// Kickstart length when running orthogonal questions.
    pub kickstart_orthogonal_max: usize,
    /// Pairs requested per oracle block, and the block kickstart length.
    pub block_size: usize,
    /// Mean belief variance below which the session converges.
    pub convergence_threshold: f64,
    /// Consecutive adaptive oracle failures before the escalation warning.
    pub oracle_failure_warn_threshold: usize,
    /// Mean prior variance above which priors count as diffuse.
    pub diffuse_variance_threshold: f64,
    /// Mean prior variance at or below which strong priors skip the
    /// kickstart.
    pub strong_prior_variance_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_questions: 8,
            kickstart_orthogonal_max: 3,
            block_size: 4,
            convergence_threshold: 1.0,
            oracle_failure_warn_threshold: 3,
            diffuse_variance_threshold: 2.0,
            strong_prior_variance_threshold: 0.75,
        }
    }
}

impl EngineConfig {
    /// The variance cutoffs for opening-phase selection.
    pub fn phase_thresholds(&self) -> PhaseThresholds {
        PhaseThresholds {
            diffuse_variance: self.diffuse_variance_threshold,
            strong_prior_variance: self.strong_prior_variance_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_questions == 0 {
            return Err(ConfigError::invalid("engine.max_questions", "must be > 0"));
        }
        if self.block_size == 0 {
            return Err(ConfigError::invalid("engine.block_size", "must be > 0"));
        }
        if self.convergence_threshold <= 0.0 {
            return Err(ConfigError::invalid(
                "engine.convergence_threshold",
                "must be > 0",
            ));
        }
        if self.strong_prior_variance_threshold > self.diffuse_variance_threshold {
            return Err(ConfigError::invalid(
                "engine.strong_prior_variance_threshold",
                "must not exceed diffuse_variance_threshold",
            ));
        }
        Ok(())
    }
}
