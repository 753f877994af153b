//! Session prior seeding and quality assessment.
//!
//! Informed priors arrive already typed from whatever produced them (an
//! external generator, a stored profile); the heuristic fallback here only
//! knows level positions. The assessment summarizing prior quality and
//! spread is what the phase controller keys its opening strategy on.

use std::collections::BTreeMap;

use crate::domain::criteria::{CriteriaSet, LevelKey};
use crate::domain::profile::LongTermProfile;

use super::{BeliefStore, UtilityBelief, DEFAULT_VARIANCE};

/// Variance assigned to heuristically-seeded non-reference levels.
const HEURISTIC_VARIANCE: f64 = 3.0;

/// How trustworthy the starting priors are, as reported by whatever
/// produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorQuality {
    /// Position heuristics only; nothing informed these priors.
    HeuristicFallback,
    LowConfidence,
    MediumConfidence,
    /// Informed values patched with heuristics for some levels.
    Mixed,
    HighConfidence,
}

impl PriorQuality {
    /// True when the priors were produced without any informed source.
    pub fn is_fallback(&self) -> bool {
        matches!(self, PriorQuality::HeuristicFallback)
    }
}

/// Non-reference starting beliefs handed to the engine, keyed on the
/// decision space they were built for.
#[derive(Debug, Clone)]
pub struct InformedPriors {
    values: BTreeMap<LevelKey, UtilityBelief>,
    quality: PriorQuality,
}

impl InformedPriors {
    /// Wraps externally-produced priors. Reference-level entries are
    /// ignored; reference levels always seed at (0.0, 0.1).
    pub fn new(values: BTreeMap<LevelKey, UtilityBelief>, quality: PriorQuality) -> Self {
        let values = values.into_iter().filter(|(k, _)| !k.is_reference()).collect();
        Self { values, quality }
    }

    /// Position-based default priors: in a 3-level criterion the middle
    /// level tends to read as an upgrade (0.3) and the last as a lateral
    /// move (-0.1), all held loosely.
    pub fn heuristic(set: &CriteriaSet) -> Self {
        let values = set
            .non_reference_keys()
            .map(|key| {
                let mean = heuristic_position_mean(key.level);
                (key, UtilityBelief::new(mean, HEURISTIC_VARIANCE))
            })
            .collect();
        Self {
            values,
            quality: PriorQuality::HeuristicFallback,
        }
    }

    pub fn quality(&self) -> PriorQuality {
        self.quality
    }

    pub fn get(&self, key: LevelKey) -> Option<UtilityBelief> {
        self.values.get(&key).copied()
    }
}

/// Default mean for a non-reference level by its position in a 3-level
/// criterion.
pub fn heuristic_position_mean(level: usize) -> f64 {
    match level {
        1 => 0.3,
        2 => -0.1,
        _ => 0.1 * level as f64,
    }
}

/// Seeds the session belief store. Reference levels start at (0.0, 0.1);
/// non-reference levels take the informed prior when one exists, otherwise
/// the long-term profile's stored posterior, otherwise (0.0, 10.0).
pub fn seed_beliefs(
    set: &CriteriaSet,
    informed: Option<&InformedPriors>,
    profile: &LongTermProfile,
) -> BeliefStore {
    let mut store = BeliefStore::new();
    for key in set.level_keys() {
        let belief = if key.is_reference() {
            UtilityBelief::reference()
        } else if let Some(prior) = informed.and_then(|p| p.get(key)) {
            prior
        } else {
            let (criterion, level) = set.names_for(key);
            let (mean, variance) = profile.level_prior(criterion, level);
            UtilityBelief::new(mean, variance)
        };
        store.set(key, belief);
    }
    store
}

/// Summary of the starting priors the phase controller selects its opening
/// strategy from.
#[derive(Debug, Clone, Copy)]
pub struct PriorAssessment {
    pub quality: PriorQuality,
    /// Mean starting variance over non-reference beliefs.
    pub mean_variance: f64,
}

impl PriorAssessment {
    /// Assesses a freshly-seeded store.
    pub fn from_store(quality: PriorQuality, store: &BeliefStore) -> Self {
        Self {
            quality,
            mean_variance: store
                .mean_non_reference_variance()
                .unwrap_or(DEFAULT_VARIANCE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criteria::fixtures::price_speed_support;

    #[test]
    fn heuristic_priors_follow_position() {
        let set = price_speed_support();
        let priors = InformedPriors::heuristic(&set);
        assert_eq!(priors.quality(), PriorQuality::HeuristicFallback);
        let mid = priors.get(LevelKey::new(0, 1)).unwrap();
        assert_eq!(mid.mean, 0.3);
        assert_eq!(mid.variance, 3.0);
        let last = priors.get(LevelKey::new(2, 2)).unwrap();
        assert_eq!(last.mean, -0.1);
    }

    #[test]
    fn informed_priors_drop_reference_entries() {
        let mut values = BTreeMap::new();
        values.insert(LevelKey::new(0, 0), UtilityBelief::new(1.0, 1.0));
        values.insert(LevelKey::new(0, 1), UtilityBelief::new(0.4, 0.5));
        let priors = InformedPriors::new(values, PriorQuality::HighConfidence);
        assert!(priors.get(LevelKey::new(0, 0)).is_none());
        assert!(priors.get(LevelKey::new(0, 1)).is_some());
    }

    #[test]
    fn seed_beliefs_sets_reference_levels() {
        let set = price_speed_support();
        let store = seed_beliefs(&set, None, &LongTermProfile::default());
        let reference = store.get(LevelKey::new(1, 0));
        assert_eq!(reference.mean, 0.0);
        assert_eq!(reference.variance, 0.1);
    }

    #[test]
    fn seed_beliefs_defaults_unseen_levels_to_diffuse() {
        let set = price_speed_support();
        let store = seed_beliefs(&set, None, &LongTermProfile::default());
        let b = store.get(LevelKey::new(0, 2));
        assert_eq!(b.mean, 0.0);
        assert_eq!(b.variance, 10.0);
    }

    #[test]
    fn seed_beliefs_prefers_informed_priors() {
        let set = price_speed_support();
        let mut values = BTreeMap::new();
        values.insert(LevelKey::new(0, 1), UtilityBelief::new(0.8, 0.5));
        let priors = InformedPriors::new(values, PriorQuality::HighConfidence);
        let store = seed_beliefs(&set, Some(&priors), &LongTermProfile::default());
        assert_eq!(store.get(LevelKey::new(0, 1)).mean, 0.8);
        // Levels the informed set does not cover still fall back.
        assert_eq!(store.get(LevelKey::new(0, 2)).variance, 10.0);
    }

    #[test]
    fn seed_beliefs_reads_long_term_profile() {
        let set = price_speed_support();
        let mut profile = LongTermProfile::default();
        profile.set_level("Price", "mid", 1.2, 0.4);
        let store = seed_beliefs(&set, None, &profile);
        let b = store.get(LevelKey::new(0, 1));
        assert_eq!(b.mean, 1.2);
        assert_eq!(b.variance, 0.4);
    }

    #[test]
    fn assessment_uses_non_reference_variance() {
        let set = price_speed_support();
        let store = seed_beliefs(&set, None, &LongTermProfile::default());
        let assessment = PriorAssessment::from_store(PriorQuality::HeuristicFallback, &store);
        assert!((assessment.mean_variance - 10.0).abs() < 1e-12);
    }
}
