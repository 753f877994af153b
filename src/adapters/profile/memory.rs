//! In-memory profile store for tests and ephemeral sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::UserId;
use crate::domain::profile::LongTermProfile;
use crate::ports::{ProfileStore, ProfileStoreError};

/// Profile store backed by a shared map; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<Mutex<HashMap<String, LongTermProfile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user's profile, for tests.
    pub fn with_profile(self, user: &UserId, profile: LongTermProfile) -> Self {
        self.profiles
            .lock()
            .expect("profile store lock poisoned")
            .insert(user.as_str().to_string(), profile);
        self
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, user: &UserId) -> Result<LongTermProfile, ProfileStoreError> {
        Ok(self
            .profiles
            .lock()
            .expect("profile store lock poisoned")
            .get(user.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn save(
        &self,
        user: &UserId,
        profile: &LongTermProfile,
    ) -> Result<(), ProfileStoreError> {
        self.profiles
            .lock()
            .expect("profile store lock poisoned")
            .insert(user.as_str().to_string(), profile.clone());
        Ok(())
    }
}
