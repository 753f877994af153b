//! The single owned table of utility beliefs.
//!
//! Every component reads and writes through this interface; nothing else
//! aliases the map, so a mutation here is visible to all subsequent reads
//! within the session.

use std::collections::BTreeMap;

use crate::domain::criteria::LevelKey;

use super::UtilityBelief;

/// In-session belief table keyed by (criterion, level).
#[derive(Debug, Clone, Default)]
pub struct BeliefStore {
    beliefs: BTreeMap<LevelKey, UtilityBelief>,
}

impl BeliefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the belief for a key, falling back to the unseen default
    /// (mean 0, variance 10).
    pub fn get(&self, key: LevelKey) -> UtilityBelief {
        self.beliefs
            .get(&key)
            .copied()
            .unwrap_or_else(UtilityBelief::unseen)
    }

    /// Returns the belief only if something has written it.
    pub fn get_known(&self, key: LevelKey) -> Option<UtilityBelief> {
        self.beliefs.get(&key).copied()
    }

    /// Writes a belief, clamping it on the way in.
    pub fn set(&mut self, key: LevelKey, belief: UtilityBelief) {
        self.beliefs.insert(key, belief.clamped());
    }

    /// Applies a pure update to the belief at `key` (the unseen default if
    /// absent), then re-clamps.
    pub fn update(&mut self, key: LevelKey, f: impl FnOnce(UtilityBelief) -> UtilityBelief) {
        let next = f(self.get(key)).clamped();
        self.beliefs.insert(key, next);
    }

    /// Re-clamps every stored belief.
    pub fn clamp_all(&mut self) {
        for belief in self.beliefs.values_mut() {
            *belief = belief.clamped();
        }
    }

    /// Arithmetic mean of variance across all known beliefs, if any.
    pub fn mean_variance(&self) -> Option<f64> {
        if self.beliefs.is_empty() {
            return None;
        }
        let total: f64 = self.beliefs.values().map(|b| b.variance).sum();
        Some(total / self.beliefs.len() as f64)
    }

    /// Mean variance restricted to non-reference levels, used for the
    /// prior-quality assessment.
    pub fn mean_non_reference_variance(&self) -> Option<f64> {
        let vars: Vec<f64> = self
            .beliefs
            .iter()
            .filter(|(k, _)| !k.is_reference())
            .map(|(_, b)| b.variance)
            .collect();
        if vars.is_empty() {
            return None;
        }
        Some(vars.iter().sum::<f64>() / vars.len() as f64)
    }

    /// Iterates all known beliefs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (LevelKey, UtilityBelief)> + '_ {
        self.beliefs.iter().map(|(k, b)| (*k, *b))
    }

    /// Number of known beliefs.
    pub fn len(&self) -> usize {
        self.beliefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beliefs.is_empty()
    }
}
