//! Mock inference sampler for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{InferenceError, InferenceReply, InferenceRequest, InferenceSampler};

/// Scripted mock sampler. Replies are consumed in order; an exhausted
/// script reports the collaborator as unavailable.
#[derive(Debug, Clone, Default)]
pub struct MockInferenceSampler {
    replies: Arc<Mutex<VecDeque<Result<InferenceReply, InferenceError>>>>,
    requests: Arc<Mutex<Vec<InferenceRequest>>>,
}

impl MockInferenceSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sampler that is never reachable.
    pub fn always_unavailable() -> Self {
        Self::new()
    }

    pub fn with_reply(self, reply: InferenceReply) -> Self {
        self.replies
            .lock()
            .expect("mock sampler lock poisoned")
            .push_back(Ok(reply));
        self
    }

    pub fn with_error(self, error: InferenceError) -> Self {
        self.replies
            .lock()
            .expect("mock sampler lock poisoned")
            .push_back(Err(error));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .expect("mock sampler lock poisoned")
            .len()
    }

    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests
            .lock()
            .expect("mock sampler lock poisoned")
            .clone()
    }
}

#[async_trait]
impl InferenceSampler for MockInferenceSampler {
    async fn fit(&self, request: &InferenceRequest) -> Result<InferenceReply, InferenceError> {
        self.requests
            .lock()
            .expect("mock sampler lock poisoned")
            .push(request.clone());
        self.replies
            .lock()
            .expect("mock sampler lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(InferenceError::Unavailable("no scripted reply".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PosteriorSummary;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn serves_scripted_replies_then_reports_unavailable() {
        let mut posteriors = BTreeMap::new();
        posteriors.insert(
            "Price_mid".to_string(),
            PosteriorSummary {
                posterior_mean: 0.9,
                posterior_sd: 0.2,
            },
        );
        let sampler = MockInferenceSampler::new().with_reply(InferenceReply { posteriors });

        let request = InferenceRequest {
            parameters: vec![],
            design_matrix: vec![],
            choices: vec![],
        };
        let reply = sampler.fit(&request).await.unwrap();
        assert_eq!(reply.posteriors["Price_mid"].posterior_mean, 0.9);

        assert!(matches!(
            sampler.fit(&request).await,
            Err(InferenceError::Unavailable(_))
        ));
        assert_eq!(sampler.request_count(), 2);
    }
}
