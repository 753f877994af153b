//! Utility beliefs: the per-level (mean, variance) estimates the whole
//! engine reads and writes.

mod belief;
mod priors;
mod store;

pub use belief::{
    UtilityBelief, DEFAULT_MEAN, DEFAULT_VARIANCE, MEAN_BOUND, REFERENCE_VARIANCE, VARIANCE_FLOOR,
};
pub use priors::{
    heuristic_position_mean, seed_beliefs, InformedPriors, PriorAssessment, PriorQuality,
};
pub use store::BeliefStore;
