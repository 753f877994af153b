//! Inference collaborator adapters.

mod http;
mod mock;

pub use http::{HttpInferenceSampler, InferenceHttpConfig};
pub use mock::MockInferenceSampler;
