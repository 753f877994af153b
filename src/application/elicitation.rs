//! The adaptive question loop.
//!
//! One `ElicitationEngine` drives one session: it selects the opening
//! phase from the prior assessment, dispatches each question to the
//! orthogonal generator, the block cache, or the design oracle, degrades
//! to deterministic fallbacks when the oracle misbehaves, applies the
//! heuristic belief updates after every answer, and stops on convergence
//! or the question cap. Oracle trouble never ends a session; only the
//! user going away does.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::beliefs::{BeliefStore, PriorAssessment};
use crate::domain::criteria::{CriteriaSet, Profile};
use crate::domain::design::{
    apply_counterfactual_answer, apply_main_choice, plan_counterfactual, BlockCache,
    ConvergenceMonitor, OrthogonalDesign,
};
use crate::domain::foundation::{SessionId, ValidationError};
use crate::domain::session::{Choice, ResponseRecord, SessionHistory, SessionPhase, SessionState};
use crate::ports::{
    interpret_reply, AnswerCollector, AnswerError, DesignMode, DesignOracle, DesignOutcome,
    DesignRequest, OracleError, QuestionKind, QuestionPrompt,
};

/// Everything a finished session leaves behind.
#[derive(Debug)]
pub struct SessionOutcome {
    pub session_id: SessionId,
    pub beliefs: BeliefStore,
    pub history: SessionHistory,
    pub questions_asked: usize,
    pub converged: bool,
    pub final_phase: SessionPhase,
}

/// Failures that end a session. Oracle problems are not among them.
#[derive(Debug, Error)]
pub enum ElicitationError {
    #[error(transparent)]
    Answer(#[from] AnswerError),

    #[error(transparent)]
    State(#[from] ValidationError),
}

/// Phase-controlled elicitation engine for a single session.
pub struct ElicitationEngine {
    session_id: SessionId,
    set: CriteriaSet,
    beliefs: BeliefStore,
    history: SessionHistory,
    state: SessionState,
    orthogonal: OrthogonalDesign,
    block_cache: BlockCache,
    convergence: ConvergenceMonitor,
    config: EngineConfig,
    oracle: Arc<dyn DesignOracle>,
    answers: Arc<dyn AnswerCollector>,
}

impl ElicitationEngine {
    /// Builds an engine over a validated decision space and seeded belief
    /// store. The opening phase is fixed here, before the loop starts.
    pub fn new(
        set: CriteriaSet,
        beliefs: BeliefStore,
        assessment: PriorAssessment,
        config: EngineConfig,
        oracle: Arc<dyn DesignOracle>,
        answers: Arc<dyn AnswerCollector>,
    ) -> Self {
        let phase = SessionPhase::initial(&assessment, &config.phase_thresholds());
        let kickstart_budget = match phase {
            SessionPhase::KickstartOrthogonal => config.kickstart_orthogonal_max,
            SessionPhase::KickstartBlock => config.block_size,
            SessionPhase::AdaptiveDirect | SessionPhase::Adaptive => 0,
        };
        let session_id = SessionId::new();
        info!(
            %session_id,
            ?phase,
            kickstart_budget,
            mean_prior_variance = assessment.mean_variance,
            "starting elicitation session"
        );

        Self {
            session_id,
            set,
            beliefs,
            history: SessionHistory::new(),
            state: SessionState::new(phase, kickstart_budget),
            orthogonal: OrthogonalDesign::new(),
            block_cache: BlockCache::new(),
            convergence: ConvergenceMonitor::new(config.convergence_threshold),
            config,
            oracle,
            answers,
        }
    }

    /// Runs the interactive loop to completion and returns the session's
    /// final beliefs and history.
    pub async fn run(mut self) -> Result<SessionOutcome, ElicitationError> {
        let total = self.config.max_questions;
        let mut converged = false;

        while self.state.question_count() < total {
            if self.state.phase().is_kickstart() && self.state.kickstart_exhausted() {
                info!(
                    kickstart_questions = self.state.kickstart_done(),
                    "kickstart complete, switching to adaptive questions"
                );
                self.state.enter_adaptive()?;
            }

            let number = self.state.begin_question();
            let (profile_a, profile_b, with_counterfactual) = self.next_pair().await?;

            let prompt = QuestionPrompt::from_pair(
                &self.set,
                QuestionKind::Main { number, total },
                &profile_a,
                &profile_b,
                None,
            );
            let choice = self.answers.choose(&prompt).await?;

            let record = ResponseRecord::new(profile_a, profile_b, choice);
            let chosen = record.chosen_profile().clone();
            let rejected = record.rejected_profile().clone();
            apply_main_choice(&mut self.beliefs, &chosen, &rejected);
            self.history.push(record);

            if with_counterfactual {
                self.run_counterfactual(&chosen, &rejected).await?;
            }

            if self.convergence.is_converged(&self.beliefs) {
                info!(questions = number, "beliefs converged, ending session");
                converged = true;
                break;
            }
            if let Some(uncertainty) = self.convergence.current_uncertainty(&self.beliefs) {
                debug!(question = number, uncertainty, "question cycle complete");
            }
        }

        Ok(SessionOutcome {
            session_id: self.session_id,
            questions_asked: self.state.question_count(),
            converged,
            final_phase: self.state.phase(),
            beliefs: self.beliefs,
            history: self.history,
        })
    }

    /// Dispatches one question to the current phase's generator. Returns
    /// the pair and whether a counterfactual follow-up should run.
    async fn next_pair(&mut self) -> Result<(Profile, Profile, bool), ElicitationError> {
        match self.state.phase() {
            SessionPhase::KickstartOrthogonal => {
                self.state.record_kickstart_question();
                let (a, b) = self.orthogonal.next_pair(&self.set);
                Ok((a, b, true))
            }
            SessionPhase::KickstartBlock => self.next_block_pair().await,
            SessionPhase::Adaptive | SessionPhase::AdaptiveDirect => {
                Ok(self.next_adaptive_pair().await)
            }
        }
    }

    /// Serves from the block cache, refetching when exhausted. A failed
    /// fetch downgrades the rest of the session to orthogonal kickstart
    /// semantics; the downgrade is one-way and this turn already serves
    /// an orthogonal pair.
    async fn next_block_pair(&mut self) -> Result<(Profile, Profile, bool), ElicitationError> {
        if self.block_cache.is_exhausted() {
            match self.fetch_block().await {
                Ok(pairs) => {
                    debug!(pairs = pairs.len(), "fetched design block");
                    self.block_cache.refill(pairs);
                }
                Err(error) => {
                    warn!(
                        %error,
                        "block design unavailable, downgrading session to orthogonal kickstart"
                    );
                    self.state
                        .downgrade_to_orthogonal(self.config.kickstart_orthogonal_max)?;
                }
            }
        }

        if self.state.phase() == SessionPhase::KickstartBlock {
            if let Some((a, b)) = self.block_cache.next() {
                self.state.record_kickstart_question();
                return Ok((a, b, true));
            }
            // A refilled cache is never empty, but an empty serve is
            // handled like a failed fetch rather than trusted.
            warn!("block cache empty after refill, downgrading session to orthogonal kickstart");
            self.state
                .downgrade_to_orthogonal(self.config.kickstart_orthogonal_max)?;
        }

        self.state.record_kickstart_question();
        let (a, b) = self.orthogonal.next_pair(&self.set);
        Ok((a, b, true))
    }

    /// Requests a single adaptive pair, falling back to one orthogonal
    /// question for this turn only when the oracle fails. No
    /// counterfactual follows adaptive questions.
    async fn next_adaptive_pair(&mut self) -> (Profile, Profile, bool) {
        match self.fetch_single().await {
            Ok((a, b)) => {
                self.state.record_oracle_success();
                (a, b, false)
            }
            Err(error) => {
                debug!(%error, "adaptive design unavailable, serving orthogonal fallback");
                if self
                    .state
                    .record_oracle_failure(self.config.oracle_failure_warn_threshold)
                {
                    warn!(
                        consecutive_failures = self.state.oracle_failures(),
                        "adaptive question generation keeps failing; continuing with \
                         orthogonal questions, learning may be less efficient"
                    );
                }
                let (a, b) = self.orthogonal.next_pair(&self.set);
                (a, b, false)
            }
        }
    }

    async fn fetch_single(&self) -> Result<(Profile, Profile), OracleError> {
        let request = DesignRequest::single(&self.set, &self.beliefs);
        let reply = self.oracle.request_design(&request).await?;
        match interpret_reply(&self.set, DesignMode::Single, &reply)? {
            DesignOutcome::Single(a, b) => Ok((a, b)),
            DesignOutcome::Block(_) => Err(OracleError::ShapeMismatch(
                "block reply to a single request".into(),
            )),
        }
    }

    async fn fetch_block(&self) -> Result<Vec<(Profile, Profile)>, OracleError> {
        let request = DesignRequest::block(&self.set, &self.beliefs, self.config.block_size);
        let reply = self.oracle.request_design(&request).await?;
        match interpret_reply(&self.set, DesignMode::Block, &reply)? {
            DesignOutcome::Block(pairs) => Ok(pairs),
            DesignOutcome::Single(..) => Err(OracleError::ShapeMismatch(
                "single reply to a block request".into(),
            )),
        }
    }

    /// The counterfactual micro-question: modified-rejected vs. the
    /// original choice. Planning failures skip silently; the main answer
    /// stands either way.
    async fn run_counterfactual(
        &mut self,
        chosen: &Profile,
        rejected: &Profile,
    ) -> Result<(), ElicitationError> {
        let Some(plan) = plan_counterfactual(&self.set, &self.beliefs, chosen, rejected) else {
            debug!("counterfactual skipped: no usable target or alternative");
            return Ok(());
        };

        let criterion = self.set.criterion(plan.criterion);
        let kind = QuestionKind::Counterfactual {
            criterion: criterion.name().to_string(),
            original_level: criterion.level_name(plan.original_level).to_string(),
            improved_level: criterion.level_name(plan.improved_level).to_string(),
        };
        let prompt = QuestionPrompt::from_pair(
            &self.set,
            kind,
            &plan.modified_rejected,
            chosen,
            Some(plan.criterion),
        );
        let choice = self.answers.choose(&prompt).await?;

        let switched = choice == Choice::OptionA;
        debug!(
            criterion = criterion.name(),
            switched, "counterfactual answered"
        );
        apply_counterfactual_answer(&mut self.beliefs, &plan, switched);
        Ok(())
    }
}
