//! Mock design oracle for testing.
//!
//! Configurable to return scripted replies in order or fail every call,
//! with request capture for verification.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::criteria::{CriteriaSet, Profile};
use crate::ports::{DesignOracle, DesignReply, DesignReplyEntry, DesignRequest, OracleError};

/// Scripted mock oracle. Replies are consumed in order; once the script
/// is exhausted every further call fails as unreachable.
#[derive(Debug, Clone, Default)]
pub struct MockDesignOracle {
    replies: Arc<Mutex<VecDeque<Result<DesignReply, OracleError>>>>,
    requests: Arc<Mutex<Vec<DesignRequest>>>,
}

impl MockDesignOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle whose every call fails: the always-degraded scenario.
    pub fn always_failing() -> Self {
        Self::new()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, reply: DesignReply) -> Self {
        self.replies
            .lock()
            .expect("mock oracle lock poisoned")
            .push_back(Ok(reply));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: OracleError) -> Self {
        self.replies
            .lock()
            .expect("mock oracle lock poisoned")
            .push_back(Err(error));
        self
    }

    /// Builds a single-mode wire reply from typed profiles.
    pub fn single_reply(set: &CriteriaSet, a: &Profile, b: &Profile) -> DesignReply {
        DesignReply {
            profile_a: Some(set.profile_to_names(a)),
            profile_b: Some(set.profile_to_names(b)),
            ..DesignReply::default()
        }
    }

    /// Builds a block-mode wire reply from typed profile pairs.
    pub fn block_reply(set: &CriteriaSet, pairs: &[(Profile, Profile)]) -> DesignReply {
        DesignReply {
            design_block: Some(
                pairs
                    .iter()
                    .map(|(a, b)| DesignReplyEntry {
                        profile_a: Some(set.profile_to_names(a)),
                        profile_b: Some(set.profile_to_names(b)),
                    })
                    .collect(),
            ),
            ..DesignReply::default()
        }
    }

    /// Requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock oracle lock poisoned").len()
    }

    /// Copy of the captured requests, for protocol assertions.
    pub fn requests(&self) -> Vec<DesignRequest> {
        self.requests
            .lock()
            .expect("mock oracle lock poisoned")
            .clone()
    }
}

#[async_trait]
impl DesignOracle for MockDesignOracle {
    async fn request_design(&self, request: &DesignRequest) -> Result<DesignReply, OracleError> {
        self.requests
            .lock()
            .expect("mock oracle lock poisoned")
            .push(request.clone());
        self.replies
            .lock()
            .expect("mock oracle lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::Unreachable("no scripted reply".into())))
    }
}
