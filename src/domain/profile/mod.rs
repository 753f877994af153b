//! The user's persisted long-term preference profile.
//!
//! Keyed by criterion and level *names* rather than indices: the profile
//! outlives any single session, and a future session may define the same
//! criteria in a different order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::beliefs::{DEFAULT_MEAN, DEFAULT_VARIANCE};

/// Posterior stored for one level: the reconciler's (mean, sd^2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelPosterior {
    pub mean_utility: f64,
    pub variance: f64,
}

/// Per-user persisted mapping criterion -> level -> posterior. Loaded once
/// at session start as priors and overwritten wholesale after
/// reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LongTermProfile {
    criteria: BTreeMap<String, BTreeMap<String, LevelPosterior>>,
}

impl LongTermProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored (mean, variance) for a level, or the diffuse
    /// default (0.0, 10.0) when the profile has never seen it.
    pub fn level_prior(&self, criterion: &str, level: &str) -> (f64, f64) {
        self.criteria
            .get(criterion)
            .and_then(|levels| levels.get(level))
            .map(|p| (p.mean_utility, p.variance))
            .unwrap_or((DEFAULT_MEAN, DEFAULT_VARIANCE))
    }

    /// Overwrites one level's stored posterior.
    pub fn set_level(&mut self, criterion: &str, level: &str, mean_utility: f64, variance: f64) {
        self.criteria
            .entry(criterion.to_string())
            .or_default()
            .insert(
                level.to_string(),
                LevelPosterior {
                    mean_utility,
                    variance,
                },
            );
    }

    /// True when no level has ever been stored.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Number of stored levels across all criteria.
    pub fn level_count(&self) -> usize {
        self.criteria.values().map(|levels| levels.len()).sum()
    }
}
