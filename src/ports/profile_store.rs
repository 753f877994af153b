//! Profile persistence port with an explicit load/save lifecycle.
//!
//! Loaded once at engine construction, overwritten wholesale after
//! reconciliation. Persistence is single-writer per user; overlapping
//! reconciliations must be serialized by the caller.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::profile::LongTermProfile;

/// Profile persistence failures. Corrupt stored data is not one of them:
/// adapters recover from corruption by returning an empty profile with a
/// warning.
#[derive(Debug, Clone, Error)]
pub enum ProfileStoreError {
    #[error("profile storage I/O failed: {0}")]
    Io(String),

    #[error("profile serialization failed: {0}")]
    Serialization(String),
}

/// Repository for per-user long-term profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Loads the user's profile; a missing or corrupt store yields the
    /// empty default, never an error.
    async fn load(&self, user: &UserId) -> Result<LongTermProfile, ProfileStoreError>;

    /// Overwrites the user's profile.
    async fn save(&self, user: &UserId, profile: &LongTermProfile)
        -> Result<(), ProfileStoreError>;
}
