//! End-of-session posterior reconciliation.
//!
//! Refits every estimable parameter against the full response history via
//! the inference collaborator and overwrites the long-term profile's
//! entries with the posterior summaries. Runs once, after the interactive
//! loop; any failure is a skip, never an abort - the in-session
//! recommendation has already been delivered.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::criteria::{CriteriaSet, LevelKey};
use crate::domain::profile::LongTermProfile;
use crate::domain::session::SessionHistory;
use crate::ports::{InferenceRequest, InferenceSampler, ParameterPrior, QuestionIndicators};

/// Variance floor applied before taking the prior standard deviation.
const PRIOR_VARIANCE_FLOOR: f64 = 1e-6;

/// What the reconciliation pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The profile was overwritten with this many refitted parameters.
    Updated { parameters: usize },
    /// Nothing was changed.
    Skipped { reason: String },
}

impl ReconcileOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, ReconcileOutcome::Updated { .. })
    }
}

/// Rigorous end-of-session refit against the full history.
pub struct PosteriorReconciler {
    sampler: Arc<dyn InferenceSampler>,
}

impl PosteriorReconciler {
    pub fn new(sampler: Arc<dyn InferenceSampler>) -> Self {
        Self { sampler }
    }

    /// Reconciles the profile in place. The caller persists it only when
    /// the outcome reports an update.
    pub async fn reconcile(
        &self,
        set: &CriteriaSet,
        history: &SessionHistory,
        profile: &mut LongTermProfile,
    ) -> ReconcileOutcome {
        if history.is_empty() {
            info!("no session history recorded, skipping posterior reconciliation");
            return ReconcileOutcome::Skipped {
                reason: "empty history".into(),
            };
        }

        // A parameter is estimable only if some presented profile
        // actually carried it; an all-reference history has none.
        let parameters: Vec<LevelKey> = set
            .non_reference_keys()
            .filter(|key| {
                history.records().iter().any(|r| {
                    r.profile_a.level(key.criterion) == key.level
                        || r.profile_b.level(key.criterion) == key.level
                })
            })
            .collect();

        if parameters.is_empty() {
            info!("no estimable parameters in history, skipping posterior reconciliation");
            return ReconcileOutcome::Skipped {
                reason: "no estimable parameters".into(),
            };
        }

        let request = build_request(set, history, &parameters, profile);

        let reply = match self.sampler.fit(&request).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(%error, "posterior refit failed, long-term profile left unchanged");
                return ReconcileOutcome::Skipped {
                    reason: error.to_string(),
                };
            }
        };

        let mut updated = 0;
        for (key, prior) in parameters.iter().zip(&request.parameters) {
            let Some(summary) = reply.posteriors.get(&prior.name) else {
                warn!(parameter = %prior.name, "posterior missing from inference reply");
                continue;
            };
            let (criterion, level) = set.names_for(*key);
            profile.set_level(
                criterion,
                level,
                summary.posterior_mean,
                summary.posterior_sd * summary.posterior_sd,
            );
            updated += 1;
        }

        info!(
            parameters = updated,
            questions = history.len(),
            "long-term profile reconciled against session history"
        );
        ReconcileOutcome::Updated {
            parameters: updated,
        }
    }
}

/// Packages the history as the collaborator's wire request: per-parameter
/// normal priors seeded from the profile, binary indicator rows per
/// question option, and the 0/1 choice vector.
fn build_request(
    set: &CriteriaSet,
    history: &SessionHistory,
    parameters: &[LevelKey],
    profile: &LongTermProfile,
) -> InferenceRequest {
    let priors = parameters
        .iter()
        .map(|key| {
            let (criterion, level) = set.names_for(*key);
            let (mean, variance) = profile.level_prior(criterion, level);
            ParameterPrior {
                name: format!("{}_{}", criterion, level),
                prior_mean: mean,
                prior_sd: variance.max(PRIOR_VARIANCE_FLOOR).sqrt(),
            }
        })
        .collect();

    let design_matrix = history
        .records()
        .iter()
        .map(|record| QuestionIndicators {
            option_a: parameters
                .iter()
                .map(|key| u8::from(record.profile_a.level(key.criterion) == key.level))
                .collect(),
            option_b: parameters
                .iter()
                .map(|key| u8::from(record.profile_b.level(key.criterion) == key.level))
                .collect(),
        })
        .collect();

    let choices = history
        .records()
        .iter()
        .map(|record| record.chosen.index() as u8)
        .collect();

    InferenceRequest {
        parameters: priors,
        design_matrix,
        choices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::inference::MockInferenceSampler;
    use crate::domain::criteria::fixtures::price_speed_support;
    use crate::domain::session::{Choice, ResponseRecord};
    use crate::ports::{InferenceError, InferenceReply, PosteriorSummary};
    use std::collections::BTreeMap;

    fn history_with(records: Vec<ResponseRecord>) -> SessionHistory {
        let mut history = SessionHistory::new();
        for record in records {
            history.push(record);
        }
        history
    }

    #[tokio::test]
    async fn all_reference_history_skips_and_leaves_profile_untouched() {
        let set = price_speed_support();
        let reference = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let history = history_with(vec![ResponseRecord::new(
            reference.clone(),
            reference.clone(),
            Choice::OptionA,
        )]);

        let sampler = MockInferenceSampler::new();
        let reconciler = PosteriorReconciler::new(Arc::new(sampler.clone()));

        let mut profile = LongTermProfile::default();
        profile.set_level("Price", "mid", 0.4, 0.5);
        let before = profile.clone();

        let outcome = reconciler.reconcile(&set, &history, &mut profile).await;
        assert!(matches!(outcome, ReconcileOutcome::Skipped { .. }));
        assert_eq!(profile, before);
        // The collaborator was never consulted.
        assert_eq!(sampler.request_count(), 0);
    }

    #[tokio::test]
    async fn empty_history_skips() {
        let set = price_speed_support();
        let reconciler =
            PosteriorReconciler::new(Arc::new(MockInferenceSampler::always_unavailable()));
        let mut profile = LongTermProfile::default();
        let outcome = reconciler
            .reconcile(&set, &SessionHistory::new(), &mut profile)
            .await;
        assert!(matches!(outcome, ReconcileOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn unavailable_sampler_skips_without_touching_profile() {
        let set = price_speed_support();
        let a = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let b = set.profile_from_indices(&[1, 1, 1]).unwrap();
        let history = history_with(vec![ResponseRecord::new(a, b, Choice::OptionA)]);

        let reconciler =
            PosteriorReconciler::new(Arc::new(MockInferenceSampler::always_unavailable()));
        let mut profile = LongTermProfile::default();
        let before = profile.clone();

        let outcome = reconciler.reconcile(&set, &history, &mut profile).await;
        assert!(matches!(outcome, ReconcileOutcome::Skipped { .. }));
        assert_eq!(profile, before);
    }

    #[tokio::test]
    async fn sampling_failure_is_a_skip_not_a_crash() {
        let set = price_speed_support();
        let a = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let b = set.profile_from_indices(&[1, 1, 1]).unwrap();
        let history = history_with(vec![ResponseRecord::new(a, b, Choice::OptionB)]);

        let sampler = MockInferenceSampler::new()
            .with_error(InferenceError::SamplingFailed("divergent chains".into()));
        let reconciler = PosteriorReconciler::new(Arc::new(sampler));
        let mut profile = LongTermProfile::default();

        let outcome = reconciler.reconcile(&set, &history, &mut profile).await;
        assert!(matches!(outcome, ReconcileOutcome::Skipped { .. }));
        assert!(profile.is_empty());
    }

    #[tokio::test]
    async fn successful_refit_overwrites_observed_parameters() {
        let set = price_speed_support();
        let a = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let b = set.profile_from_indices(&[1, 1, 1]).unwrap();
        let history = history_with(vec![ResponseRecord::new(a, b, Choice::OptionA)]);

        let mut posteriors = BTreeMap::new();
        for name in ["Price_mid", "Speed_medium", "Support_standard"] {
            posteriors.insert(
                name.to_string(),
                PosteriorSummary {
                    posterior_mean: -0.6,
                    posterior_sd: 0.3,
                },
            );
        }
        let sampler = MockInferenceSampler::new().with_reply(InferenceReply { posteriors });
        let reconciler = PosteriorReconciler::new(Arc::new(sampler.clone()));

        let mut profile = LongTermProfile::default();
        let outcome = reconciler.reconcile(&set, &history, &mut profile).await;
        assert_eq!(outcome, ReconcileOutcome::Updated { parameters: 3 });

        // Posterior sd is stored squared, as a variance.
        let (mean, variance) = profile.level_prior("Price", "mid");
        assert_eq!(mean, -0.6);
        assert!((variance - 0.09).abs() < 1e-12);

        // Only observed levels are estimable: the level-2 parameters
        // never appeared and were not requested.
        let request = &sampler.requests()[0];
        let names: Vec<_> = request.parameters.iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["Price_mid", "Speed_medium", "Support_standard"]);
        assert_eq!(profile.level_prior("Price", "high"), (0.0, 10.0));
    }

    #[tokio::test]
    async fn request_encodes_indicators_and_choices() {
        let set = price_speed_support();
        let a = set.profile_from_indices(&[0, 2, 1]).unwrap();
        let b = set.profile_from_indices(&[1, 0, 1]).unwrap();
        let history = history_with(vec![ResponseRecord::new(a, b, Choice::OptionB)]);

        let sampler = MockInferenceSampler::new()
            .with_error(InferenceError::Unavailable("capture only".into()));
        let reconciler = PosteriorReconciler::new(Arc::new(sampler.clone()));
        let mut profile = LongTermProfile::default();
        profile.set_level("Speed", "fast", 0.5, 4.0);

        let _ = reconciler.reconcile(&set, &history, &mut profile).await;

        let request = &sampler.requests()[0];
        // Estimable parameters in space order: Price_mid, Speed_fast,
        // Support_standard.
        let names: Vec<_> = request.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Price_mid", "Speed_fast", "Support_standard"]);

        // Priors come from the profile, sd = sqrt(variance).
        assert_eq!(request.parameters[1].prior_mean, 0.5);
        assert!((request.parameters[1].prior_sd - 2.0).abs() < 1e-12);

        // Option A carries Speed_fast and Support_standard; option B
        // carries Price_mid and Support_standard.
        assert_eq!(request.design_matrix[0].option_a, vec![0, 1, 1]);
        assert_eq!(request.design_matrix[0].option_b, vec![1, 0, 1]);
        assert_eq!(request.choices, vec![1]);
    }
}
