//! Synchronous belief nudges applied after each main answer.

use crate::domain::beliefs::{BeliefStore, UtilityBelief};
use crate::domain::criteria::Profile;

const CHOSEN_MEAN_BOOST: f64 = 0.2;
const CHOSEN_VARIANCE_FACTOR: f64 = 0.9;
const REJECTED_MEAN_PENALTY: f64 = 0.1;
const REJECTED_VARIANCE_FACTOR: f64 = 0.95;

/// Nudges beliefs toward the chosen profile and away from the contrasted
/// parts of the rejected one. Levels identical across both profiles carry
/// no information and are left untouched.
pub fn apply_main_choice(store: &mut BeliefStore, chosen: &Profile, rejected: &Profile) {
    for key in chosen.keys() {
        store.update(key, |b| UtilityBelief {
            mean: b.mean + CHOSEN_MEAN_BOOST,
            variance: b.variance * CHOSEN_VARIANCE_FACTOR,
        });
    }
    for key in rejected.keys() {
        if chosen.level(key.criterion) == key.level {
            continue;
        }
        store.update(key, |b| UtilityBelief {
            mean: b.mean - REJECTED_MEAN_PENALTY,
            variance: b.variance * REJECTED_VARIANCE_FACTOR,
        });
    }
}
