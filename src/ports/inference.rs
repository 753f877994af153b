//! Inference collaborator port - the end-of-session Bayesian refit.
//!
//! The reconciler packages the response history as a binary indicator
//! design matrix with per-parameter normal priors; the collaborator runs
//! approximate inference (an MCMC sampler or equivalent) over the
//! two-option softmax choice model and returns per-parameter posterior
//! summaries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Prior for one estimable parameter (a non-reference criterion level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterPrior {
    /// Wire name, "criterion_level".
    pub name: String,
    pub prior_mean: f64,
    pub prior_sd: f64,
}

/// 0/1 indicator rows for one question's two options, one entry per
/// parameter in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionIndicators {
    pub option_a: Vec<u8>,
    pub option_b: Vec<u8>,
}

/// Wire request for a posterior refit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRequest {
    pub parameters: Vec<ParameterPrior>,
    /// questions x 2 options x parameters.
    pub design_matrix: Vec<QuestionIndicators>,
    /// 0 (option A) or 1 (option B) per question.
    pub choices: Vec<u8>,
}

/// Posterior summary for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosteriorSummary {
    pub posterior_mean: f64,
    pub posterior_sd: f64,
}

/// Wire reply: posterior summaries keyed by parameter name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceReply {
    pub posteriors: BTreeMap<String, PosteriorSummary>,
}

/// Inference failure classes. All are non-fatal: reconciliation is
/// skipped and the long-term profile left untouched.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    /// Collaborator not reachable or not installed.
    #[error("inference collaborator unavailable: {0}")]
    Unavailable(String),

    /// The sampler ran but failed to converge or crashed.
    #[error("sampling failed: {0}")]
    SamplingFailed(String),

    /// The reply was not parseable.
    #[error("inference reply malformed: {0}")]
    Malformed(String),
}

/// Port to the external inference collaborator.
#[async_trait]
pub trait InferenceSampler: Send + Sync {
    async fn fit(&self, request: &InferenceRequest) -> Result<InferenceReply, InferenceError>;
}
