//! Counterfactual refinement: modify one uncertain attribute of the
//! just-rejected profile and ask whether the user would switch.

use crate::domain::beliefs::{BeliefStore, UtilityBelief};
use crate::domain::criteria::{CriteriaSet, LevelKey, Profile, LEVELS_PER_CRITERION};

const SWITCHED_IMPROVED_BOOST: f64 = 0.5;
const SWITCHED_IMPROVED_VARIANCE: f64 = 0.6;
const SWITCHED_ORIGINAL_PENALTY: f64 = 0.3;
const SWITCHED_ORIGINAL_VARIANCE: f64 = 0.8;
const STAYED_IMPROVED_PENALTY: f64 = 0.2;
const STAYED_IMPROVED_VARIANCE: f64 = 0.7;
const STAYED_ORIGINAL_PENALTY: f64 = 0.1;

/// A planned counterfactual micro-question.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterfactualPlan {
    /// Criterion being probed.
    pub criterion: usize,
    /// The rejected profile's level on that criterion.
    pub original_level: usize,
    /// The substituted level.
    pub improved_level: usize,
    /// The rejected profile with the substitution applied.
    pub modified_rejected: Profile,
}

impl CounterfactualPlan {
    pub fn original_key(&self) -> LevelKey {
        LevelKey::new(self.criterion, self.original_level)
    }

    pub fn improved_key(&self) -> LevelKey {
        LevelKey::new(self.criterion, self.improved_level)
    }
}

/// Index substitution for the probed criterion: step up from the bottom
/// levels, step back from the top.
fn improved_index(original: usize) -> usize {
    match original {
        0 => 1,
        1 => 2,
        2 => 1,
        other => other,
    }
}

/// Picks the attribute to probe on the rejected profile: the key with the
/// highest current belief variance, ties broken by encounter order. When
/// no belief data exists at all, the first criterion is probed.
fn select_target(store: &BeliefStore, rejected: &Profile) -> LevelKey {
    let mut best: Option<(f64, LevelKey)> = None;
    for key in rejected.keys() {
        if let Some(belief) = store.get_known(key) {
            let replace = match best {
                Some((best_var, _)) => belief.variance > best_var,
                None => true,
            };
            if replace {
                best = Some((belief.variance, key));
            }
        }
    }
    best.map(|(_, key)| key)
        .unwrap_or_else(|| LevelKey::new(0, rejected.level(0)))
}

/// Plans the counterfactual for the just-answered question, or `None`
/// when the step should be skipped: no distinct alternative level exists,
/// the probed criterion is not 3-level, or the modified rejected profile
/// collapses onto the chosen one.
pub fn plan_counterfactual(
    set: &CriteriaSet,
    store: &BeliefStore,
    chosen: &Profile,
    rejected: &Profile,
) -> Option<CounterfactualPlan> {
    let target = select_target(store, rejected);
    let criterion = set.criterion(target.criterion);
    if criterion.levels().len() != LEVELS_PER_CRITERION {
        return None;
    }

    let mut improved = improved_index(target.level);
    if improved >= criterion.levels().len() || improved == target.level {
        improved = (0..criterion.levels().len()).find(|&i| i != target.level)?;
    }
    if improved == target.level {
        return None;
    }

    let modified_rejected = rejected.with_level(target.criterion, improved);
    if &modified_rejected == chosen {
        return None;
    }

    Some(CounterfactualPlan {
        criterion: target.criterion,
        original_level: target.level,
        improved_level: improved,
        modified_rejected,
    })
}

/// Applies the belief updates for the counterfactual answer, then
/// re-clamps the whole store.
pub fn apply_counterfactual_answer(store: &mut BeliefStore, plan: &CounterfactualPlan, switched: bool) {
    let improved = plan.improved_key();
    let original = plan.original_key();

    if switched {
        store.update(improved, |b| UtilityBelief {
            mean: b.mean + SWITCHED_IMPROVED_BOOST,
            variance: b.variance * SWITCHED_IMPROVED_VARIANCE,
        });
        store.update(original, |b| UtilityBelief {
            mean: b.mean - SWITCHED_ORIGINAL_PENALTY,
            variance: b.variance * SWITCHED_ORIGINAL_VARIANCE,
        });
    } else {
        store.update(improved, |b| UtilityBelief {
            mean: b.mean - STAYED_IMPROVED_PENALTY,
            variance: b.variance * STAYED_IMPROVED_VARIANCE,
        });
        store.update(original, |b| UtilityBelief {
            mean: b.mean - STAYED_ORIGINAL_PENALTY,
            variance: b.variance,
        });
    }

    store.clamp_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criteria::fixtures::price_speed_support;

    fn seeded_store(set: &CriteriaSet) -> BeliefStore {
        let mut store = BeliefStore::new();
        for key in set.level_keys() {
            store.set(key, UtilityBelief::new(0.0, 1.0));
        }
        store
    }

    #[test]
    fn transition_table_holds() {
        assert_eq!(improved_index(0), 1);
        assert_eq!(improved_index(1), 2);
        assert_eq!(improved_index(2), 1);
    }

    #[test]
    fn targets_highest_variance_level_on_rejected() {
        let set = price_speed_support();
        let chosen = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let rejected = set.profile_from_indices(&[1, 2, 1]).unwrap();

        let mut store = seeded_store(&set);
        store.set(LevelKey::new(1, 2), UtilityBelief::new(0.0, 9.0));

        let plan = plan_counterfactual(&set, &store, &chosen, &rejected).unwrap();
        assert_eq!(plan.criterion, 1);
        assert_eq!(plan.original_level, 2);
        assert_eq!(plan.improved_level, 1);
        assert_eq!(plan.modified_rejected.level(1), 1);
    }

    #[test]
    fn variance_ties_break_by_encounter_order() {
        let set = price_speed_support();
        let chosen = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let rejected = set.profile_from_indices(&[1, 1, 1]).unwrap();

        let store = seeded_store(&set);
        let plan = plan_counterfactual(&set, &store, &chosen, &rejected).unwrap();
        assert_eq!(plan.criterion, 0);
        assert_eq!(plan.original_level, 1);
        assert_eq!(plan.improved_level, 2);
    }

    #[test]
    fn falls_back_to_first_criterion_without_belief_data() {
        let set = price_speed_support();
        let chosen = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let rejected = set.profile_from_indices(&[2, 1, 1]).unwrap();

        let store = BeliefStore::new();
        let plan = plan_counterfactual(&set, &store, &chosen, &rejected).unwrap();
        assert_eq!(plan.criterion, 0);
        assert_eq!(plan.original_level, 2);
        assert_eq!(plan.improved_level, 1);
    }

    #[test]
    fn skips_when_modification_matches_chosen_profile() {
        let set = price_speed_support();
        // Rejected differs from chosen only on Price (level 0 vs 1); the
        // 0 -> 1 substitution would reproduce the chosen profile exactly.
        let chosen = set.profile_from_indices(&[1, 1, 1]).unwrap();
        let rejected = set.profile_from_indices(&[0, 1, 1]).unwrap();

        let mut store = BeliefStore::new();
        store.set(LevelKey::new(0, 0), UtilityBelief::new(0.0, 5.0));

        assert!(plan_counterfactual(&set, &store, &chosen, &rejected).is_none());
    }

    #[test]
    fn switched_answer_rewards_improved_level() {
        let set = price_speed_support();
        let chosen = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let rejected = set.profile_from_indices(&[1, 1, 1]).unwrap();

        let mut store = seeded_store(&set);
        let plan = plan_counterfactual(&set, &store, &chosen, &rejected).unwrap();
        apply_counterfactual_answer(&mut store, &plan, true);

        let improved = store.get(plan.improved_key());
        assert!((improved.mean - 0.5).abs() < 1e-12);
        assert!((improved.variance - 0.6).abs() < 1e-12);

        let original = store.get(plan.original_key());
        assert!((original.mean + 0.3).abs() < 1e-12);
        assert!((original.variance - 0.8).abs() < 1e-12);
    }

    #[test]
    fn stayed_answer_penalizes_both_levels() {
        let set = price_speed_support();
        let chosen = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let rejected = set.profile_from_indices(&[1, 1, 1]).unwrap();

        let mut store = seeded_store(&set);
        let plan = plan_counterfactual(&set, &store, &chosen, &rejected).unwrap();
        apply_counterfactual_answer(&mut store, &plan, false);

        let improved = store.get(plan.improved_key());
        assert!((improved.mean + 0.2).abs() < 1e-12);
        assert!((improved.variance - 0.7).abs() < 1e-12);

        let original = store.get(plan.original_key());
        assert!((original.mean + 0.1).abs() < 1e-12);
        assert!((original.variance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn updates_keep_clamping_invariants() {
        let set = price_speed_support();
        let chosen = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let rejected = set.profile_from_indices(&[1, 1, 1]).unwrap();

        let mut store = seeded_store(&set);
        store.set(LevelKey::new(0, 2), UtilityBelief::new(1.8, 0.02));
        let plan = plan_counterfactual(&set, &store, &chosen, &rejected).unwrap();
        apply_counterfactual_answer(&mut store, &plan, true);

        for (_, belief) in store.iter() {
            assert!(belief.mean >= -2.0 && belief.mean <= 2.0);
            assert!(belief.variance >= 0.01);
        }
    }
}
