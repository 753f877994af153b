//! Question-generation phases and the rules for choosing the opening one.

use serde::{Deserialize, Serialize};

use crate::domain::beliefs::PriorAssessment;
use crate::domain::foundation::StateMachine;

/// Which question-generation strategy the controller is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Deterministic orthogonal pairs with counterfactual follow-ups.
    KickstartOrthogonal,
    /// Prefetched oracle block with counterfactual follow-ups.
    KickstartBlock,
    /// Straight to single-shot oracle questions; strong priors assumed.
    AdaptiveDirect,
    /// Single-shot oracle questions after a kickstart.
    Adaptive,
}

impl SessionPhase {
    /// Whether the counterfactual micro-question follows each main answer
    /// in this phase.
    pub fn performs_counterfactual(&self) -> bool {
        matches!(
            self,
            SessionPhase::KickstartOrthogonal | SessionPhase::KickstartBlock
        )
    }

    /// Whether this phase counts against the kickstart budget.
    pub fn is_kickstart(&self) -> bool {
        self.performs_counterfactual()
    }

    /// Whether this phase issues adaptive (single-mode oracle) questions.
    pub fn is_adaptive(&self) -> bool {
        matches!(self, SessionPhase::Adaptive | SessionPhase::AdaptiveDirect)
    }
}

impl StateMachine for SessionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            (KickstartOrthogonal, Adaptive)
                // One-way downgrade after a failed block fetch.
                | (KickstartBlock, KickstartOrthogonal)
                | (KickstartBlock, Adaptive)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionPhase::*;
        match self {
            KickstartOrthogonal => vec![Adaptive],
            KickstartBlock => vec![KickstartOrthogonal, Adaptive],
            AdaptiveDirect => vec![],
            Adaptive => vec![],
        }
    }
}

/// Variance cutoffs for the opening-phase decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhaseThresholds {
    /// Above this mean variance the priors are considered diffuse.
    pub diffuse_variance: f64,
    /// At or below this mean variance (with high confidence) the priors
    /// are strong enough to skip the kickstart.
    pub strong_prior_variance: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            diffuse_variance: 2.0,
            strong_prior_variance: 0.75,
        }
    }
}

impl SessionPhase {
    /// Picks the opening phase from the prior assessment. Chosen once,
    /// before the loop starts.
    pub fn initial(assessment: &PriorAssessment, thresholds: &PhaseThresholds) -> Self {
        use crate::domain::beliefs::PriorQuality;

        if assessment.quality.is_fallback()
            || assessment.mean_variance > thresholds.diffuse_variance
        {
            SessionPhase::KickstartOrthogonal
        } else if assessment.mean_variance <= thresholds.strong_prior_variance
            && assessment.quality == PriorQuality::HighConfidence
        {
            SessionPhase::AdaptiveDirect
        } else {
            SessionPhase::KickstartBlock
        }
    }
}
