//! Ranking the user's real choices against the elicited beliefs.

use crate::domain::beliefs::BeliefStore;
use crate::domain::criteria::{CriteriaSet, Profile};

/// One of the user's actual options, described on the decision space.
#[derive(Debug, Clone, PartialEq)]
pub struct RealChoice {
    pub name: String,
    pub profile: Profile,
}

impl RealChoice {
    pub fn new(name: impl Into<String>, profile: Profile) -> Self {
        Self {
            name: name.into(),
            profile,
        }
    }
}

/// A real choice with its total utility under the current beliefs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChoice {
    pub name: String,
    pub score: f64,
}

/// Scores each real choice by the sum of its levels' belief means and
/// returns them best-first. Ties keep input order.
pub fn rank_choices(
    _set: &CriteriaSet,
    store: &BeliefStore,
    choices: &[RealChoice],
) -> Vec<ScoredChoice> {
    let mut scored: Vec<ScoredChoice> = choices
        .iter()
        .map(|choice| ScoredChoice {
            name: choice.name.clone(),
            score: choice.profile.keys().map(|key| store.get(key).mean).sum(),
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::beliefs::UtilityBelief;
    use crate::domain::criteria::fixtures::price_speed_support;
    use crate::domain::criteria::LevelKey;

    #[test]
    fn ranks_by_summed_means() {
        let set = price_speed_support();
        let mut store = BeliefStore::new();
        store.set(LevelKey::new(0, 1), UtilityBelief::new(1.0, 0.1));
        store.set(LevelKey::new(1, 2), UtilityBelief::new(0.5, 0.1));
        store.set(LevelKey::new(2, 0), UtilityBelief::new(0.0, 0.1));

        let cheap = RealChoice::new("Cheap", set.profile_from_indices(&[0, 0, 0]).unwrap());
        let fast = RealChoice::new("Fast", set.profile_from_indices(&[1, 2, 0]).unwrap());

        let ranked = rank_choices(&set, &store, &[cheap, fast]);
        assert_eq!(ranked[0].name, "Fast");
        assert!((ranked[0].score - 1.5).abs() < 1e-12);
        assert_eq!(ranked[1].name, "Cheap");
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn unseen_levels_score_zero() {
        let set = price_speed_support();
        let store = BeliefStore::new();
        let only = RealChoice::new("Only", set.profile_from_indices(&[2, 2, 2]).unwrap());
        let ranked = rank_choices(&set, &store, &[only]);
        assert_eq!(ranked[0].score, 0.0);
    }
}
