//! Design Oracle port - the external generator of statistically efficient
//! paired comparisons.
//!
//! The request carries the full decision space plus prior draws sampled
//! from the current beliefs; the reply is a name-keyed wire structure that
//! `interpret_reply` converts into typed profile pairs. Every failure
//! class - transport, malformed payload, explicit error field, shape
//! mismatch - maps to `OracleError` and is recoverable: the caller falls
//! back to the orthogonal generator.

use async_trait::async_trait;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::beliefs::BeliefStore;
use crate::domain::criteria::{CriteriaSet, Profile};

/// Samples drawn per non-reference parameter for the oracle's prior.
pub const DRAWS_PER_PARAMETER: usize = 500;

/// Variance floor applied before taking the sampling standard deviation.
const SAMPLING_VARIANCE_FLOOR: f64 = 1e-6;

/// Whether one pair or a prefetched block is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignMode {
    Single,
    Block,
}

/// Wire request sent to the design oracle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    pub mode: DesignMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<usize>,
    /// Criterion name -> ordered level names.
    pub criteria_levels: BTreeMap<String, Vec<String>>,
    /// "criterion_level" -> prior draws for that parameter.
    pub prior_draws: BTreeMap<String, Vec<f64>>,
}

impl DesignRequest {
    /// Builds a single-pair request from the current beliefs.
    pub fn single(set: &CriteriaSet, beliefs: &BeliefStore) -> Self {
        Self::build(set, beliefs, DesignMode::Single, None)
    }

    /// Builds a block request from the current beliefs.
    pub fn block(set: &CriteriaSet, beliefs: &BeliefStore, size: usize) -> Self {
        Self::build(set, beliefs, DesignMode::Block, Some(size))
    }

    fn build(
        set: &CriteriaSet,
        beliefs: &BeliefStore,
        mode: DesignMode,
        block_size: Option<usize>,
    ) -> Self {
        let criteria_levels = set
            .criteria()
            .iter()
            .map(|c| (c.name().to_string(), c.levels().to_vec()))
            .collect();

        let mut rng = rand::thread_rng();
        let mut prior_draws = BTreeMap::new();
        for key in set.non_reference_keys() {
            let belief = beliefs.get(key);
            let sd = belief.variance.max(SAMPLING_VARIANCE_FLOOR).sqrt();
            let (criterion, level) = set.names_for(key);
            let draws = match Normal::new(belief.mean, sd) {
                Ok(normal) => (0..DRAWS_PER_PARAMETER)
                    .map(|_| normal.sample(&mut rng))
                    .collect(),
                // sd is always positive and finite here; a degenerate
                // belief still gets a constant draw vector.
                Err(_) => vec![belief.mean; DRAWS_PER_PARAMETER],
            };
            prior_draws.insert(format!("{}_{}", criterion, level), draws);
        }

        Self {
            mode,
            block_size,
            criteria_levels,
            prior_draws,
        }
    }
}

/// One entry of a block reply; either profile may be missing in a
/// malformed reply, which `interpret_reply` rejects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignReplyEntry {
    #[serde(default)]
    pub profile_a: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub profile_b: Option<BTreeMap<String, String>>,
}

/// Wire reply from the design oracle. Exactly one of the three shapes is
/// expected: a single pair, a design block, or an explicit error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignReply {
    #[serde(default)]
    pub profile_a: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub profile_b: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub design_block: Option<Vec<DesignReplyEntry>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A validated, typed oracle result.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignOutcome {
    Single(Profile, Profile),
    Block(Vec<(Profile, Profile)>),
}

/// All oracle failure classes. Every variant is recoverable; none aborts
/// the session.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    /// Transport or process failure reaching the oracle.
    #[error("design oracle unreachable: {0}")]
    Unreachable(String),

    /// The call exceeded its bounded timeout.
    #[error("design oracle timed out")]
    Timeout,

    /// The reply was not parseable as the wire format.
    #[error("design oracle reply malformed: {0}")]
    Malformed(String),

    /// The oracle reported an explicit error.
    #[error("design oracle rejected request: {0}")]
    Rejected(String),

    /// The reply parsed but did not match the requested shape.
    #[error("design oracle reply has wrong shape: {0}")]
    ShapeMismatch(String),
}

/// Port to the external design oracle.
#[async_trait]
pub trait DesignOracle: Send + Sync {
    /// Sends a design request and returns the raw wire reply. Transport
    /// and parse failures surface as `OracleError`; shape validation is
    /// the caller's `interpret_reply` step.
    async fn request_design(&self, request: &DesignRequest) -> Result<DesignReply, OracleError>;
}

/// Validates a wire reply against the requested mode and converts it to
/// typed profiles.
pub fn interpret_reply(
    set: &CriteriaSet,
    mode: DesignMode,
    reply: &DesignReply,
) -> Result<DesignOutcome, OracleError> {
    if let Some(message) = &reply.error {
        return Err(OracleError::Rejected(message.clone()));
    }

    match mode {
        DesignMode::Single => {
            let a = reply
                .profile_a
                .as_ref()
                .ok_or_else(|| OracleError::ShapeMismatch("missing profileA".into()))?;
            let b = reply
                .profile_b
                .as_ref()
                .ok_or_else(|| OracleError::ShapeMismatch("missing profileB".into()))?;
            let a = set
                .profile_from_names(a)
                .map_err(|e| OracleError::ShapeMismatch(e.to_string()))?;
            let b = set
                .profile_from_names(b)
                .map_err(|e| OracleError::ShapeMismatch(e.to_string()))?;
            Ok(DesignOutcome::Single(a, b))
        }
        DesignMode::Block => {
            let block = reply
                .design_block
                .as_ref()
                .ok_or_else(|| OracleError::ShapeMismatch("missing designBlock".into()))?;
            if block.is_empty() {
                return Err(OracleError::ShapeMismatch("empty designBlock".into()));
            }
            let mut pairs = Vec::with_capacity(block.len());
            for (i, entry) in block.iter().enumerate() {
                let (Some(a), Some(b)) = (&entry.profile_a, &entry.profile_b) else {
                    return Err(OracleError::ShapeMismatch(format!(
                        "designBlock entry {} lacks a profile key",
                        i
                    )));
                };
                let a = set
                    .profile_from_names(a)
                    .map_err(|e| OracleError::ShapeMismatch(e.to_string()))?;
                let b = set
                    .profile_from_names(b)
                    .map_err(|e| OracleError::ShapeMismatch(e.to_string()))?;
                pairs.push((a, b));
            }
            Ok(DesignOutcome::Block(pairs))
        }
    }
}
