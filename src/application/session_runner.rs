//! End-to-end session orchestration.
//!
//! Load the long-term profile, seed the session beliefs, run the question
//! loop, rank the user's real choices, then reconcile and persist the
//! profile. Reconciliation is awaited here so profile writes stay
//! single-writer per user.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::EngineConfig;
use crate::domain::beliefs::{seed_beliefs, InformedPriors, PriorAssessment, PriorQuality};
use crate::domain::criteria::CriteriaSet;
use crate::domain::foundation::UserId;
use crate::domain::recommendation::{rank_choices, RealChoice, ScoredChoice};
use crate::ports::{AnswerCollector, DesignOracle, InferenceSampler, ProfileStore};

use super::{
    ElicitationEngine, ElicitationError, PosteriorReconciler, ReconcileOutcome, SessionOutcome,
};

/// Failures that end a session run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Elicitation(#[from] ElicitationError),

    #[error(transparent)]
    Profile(#[from] crate::ports::ProfileStoreError),
}

/// What a completed run hands back to the caller.
#[derive(Debug)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    /// The user's real choices ranked by the session's final beliefs.
    pub ranking: Vec<ScoredChoice>,
    /// Whether reconciliation updated and persisted the profile.
    pub profile_updated: bool,
}

/// Wires the engine, reconciler, and profile lifecycle together.
pub struct SessionRunner {
    config: EngineConfig,
    oracle: Arc<dyn DesignOracle>,
    answers: Arc<dyn AnswerCollector>,
    sampler: Arc<dyn InferenceSampler>,
    profiles: Arc<dyn ProfileStore>,
}

impl SessionRunner {
    pub fn new(
        config: EngineConfig,
        oracle: Arc<dyn DesignOracle>,
        answers: Arc<dyn AnswerCollector>,
        sampler: Arc<dyn InferenceSampler>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            config,
            oracle,
            answers,
            sampler,
            profiles,
        }
    }

    /// Runs one full session for `user` over the given decision space.
    /// When no informed priors are supplied the position heuristics fill
    /// in.
    pub async fn run(
        &self,
        user: &UserId,
        set: CriteriaSet,
        real_choices: Vec<RealChoice>,
        informed: Option<InformedPriors>,
    ) -> Result<SessionReport, SessionError> {
        let mut profile = self.profiles.load(user).await?;
        info!(
            %user,
            stored_levels = profile.level_count(),
            "long-term profile loaded"
        );

        // Externally-informed priors win; otherwise a returning user's
        // stored posteriors seed the session, and only a blank slate
        // falls back to the position heuristics.
        let (beliefs, quality) = match informed {
            Some(priors) => {
                let quality = priors.quality();
                (seed_beliefs(&set, Some(&priors), &profile), quality)
            }
            None if profile.is_empty() => {
                let priors = InformedPriors::heuristic(&set);
                let quality = priors.quality();
                (seed_beliefs(&set, Some(&priors), &profile), quality)
            }
            None => (
                seed_beliefs(&set, None, &profile),
                PriorQuality::MediumConfidence,
            ),
        };
        let assessment = PriorAssessment::from_store(quality, &beliefs);

        let engine = ElicitationEngine::new(
            set.clone(),
            beliefs,
            assessment,
            self.config.clone(),
            Arc::clone(&self.oracle),
            Arc::clone(&self.answers),
        );
        let outcome = engine.run().await?;

        let ranking = rank_choices(&set, &outcome.beliefs, &real_choices);
        if let Some(best) = ranking.first() {
            info!(
                recommendation = %best.name,
                score = best.score,
                "in-session recommendation ready"
            );
        }

        let reconciler = PosteriorReconciler::new(Arc::clone(&self.sampler));
        let reconciled = reconciler
            .reconcile(&set, &outcome.history, &mut profile)
            .await;

        let profile_updated = match reconciled {
            ReconcileOutcome::Updated { .. } => {
                self.profiles.save(user, &profile).await?;
                true
            }
            ReconcileOutcome::Skipped { .. } => false,
        };

        Ok(SessionReport {
            outcome,
            ranking,
            profile_updated,
        })
    }
}
