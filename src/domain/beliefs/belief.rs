//! Utility belief value object with its clamping invariants.

use serde::{Deserialize, Serialize};

/// Means are clamped to [-MEAN_BOUND, MEAN_BOUND] after every mutation.
pub const MEAN_BOUND: f64 = 2.0;

/// Variances never drop below this floor.
pub const VARIANCE_FLOOR: f64 = 0.01;

/// Mean assumed for a level no prior has ever touched.
pub const DEFAULT_MEAN: f64 = 0.0;

/// Variance assumed for a level no prior has ever touched.
pub const DEFAULT_VARIANCE: f64 = 10.0;

/// Starting variance of each criterion's reference level.
pub const REFERENCE_VARIANCE: f64 = 0.1;

/// (mean, variance) estimate of a level's desirability relative to its
/// criterion's reference level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityBelief {
    pub mean: f64,
    pub variance: f64,
}

impl UtilityBelief {
    /// Creates a belief, immediately clamped into the legal range.
    pub fn new(mean: f64, variance: f64) -> Self {
        Self { mean, variance }.clamped()
    }

    /// The belief assumed for a level nothing has written yet.
    pub fn unseen() -> Self {
        Self::new(DEFAULT_MEAN, DEFAULT_VARIANCE)
    }

    /// The belief every reference level starts a session with.
    pub fn reference() -> Self {
        Self::new(DEFAULT_MEAN, REFERENCE_VARIANCE)
    }

    /// Returns the belief with mean clamped to [-2, 2] and variance
    /// floored at 0.01.
    pub fn clamped(self) -> Self {
        Self {
            mean: self.mean.clamp(-MEAN_BOUND, MEAN_BOUND),
            variance: self.variance.max(VARIANCE_FLOOR),
        }
    }
}
