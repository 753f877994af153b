//! Filesystem storage adapter for long-term profiles.
//!
//! One JSON document per user at `{base_dir}/{user_id}.json`. Corrupt or
//! unreadable JSON is recovered as an empty profile with a warning - a
//! bad store must never block a session.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use crate::domain::foundation::UserId;
use crate::domain::profile::LongTermProfile;
use crate::ports::{ProfileStore, ProfileStoreError};

/// Filesystem-based profile store.
pub struct FsProfileStore {
    base_dir: PathBuf,
}

impl FsProfileStore {
    /// Creates a store rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Full path to a user's profile file.
    fn profile_path(&self, user: &UserId) -> PathBuf {
        self.base_dir.join(format!("{}.json", user.as_str()))
    }
}

#[async_trait]
impl ProfileStore for FsProfileStore {
    async fn load(&self, user: &UserId) -> Result<LongTermProfile, ProfileStoreError> {
        let path = self.profile_path(user);

        if !path.exists() {
            return Ok(LongTermProfile::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| ProfileStoreError::Io(format!("failed to read {}: {e}", path.display())))?;

        match serde_json::from_str(&content) {
            Ok(profile) => Ok(profile),
            Err(e) => {
                warn!(
                    user = %user,
                    path = %path.display(),
                    error = %e,
                    "corrupt profile store, starting fresh"
                );
                Ok(LongTermProfile::default())
            }
        }
    }

    async fn save(
        &self,
        user: &UserId,
        profile: &LongTermProfile,
    ) -> Result<(), ProfileStoreError> {
        let path = self.profile_path(user);

        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| ProfileStoreError::Io(format!("failed to create directory: {e}")))?;

        let content = serde_json::to_string_pretty(profile)
            .map_err(|e| ProfileStoreError::Serialization(e.to_string()))?;

        // Write-then-rename keeps a crashed save from corrupting the
        // existing profile.
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content)
            .await
            .map_err(|e| ProfileStoreError::Io(format!("failed to write temporary file: {e}")))?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| ProfileStoreError::Io(format!("failed to rename file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_user() -> UserId {
        UserId::new("test-user").unwrap()
    }

    #[tokio::test]
    async fn missing_profile_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(dir.path());
        let profile = store.load(&test_user()).await.unwrap();
        assert!(profile.is_empty());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(dir.path());
        let user = test_user();

        let mut profile = LongTermProfile::default();
        profile.set_level("Price", "mid", 0.8, 0.25);
        store.save(&user, &profile).await.unwrap();

        let loaded = store.load(&user).await.unwrap();
        assert_eq!(loaded, profile);
    }

    #[tokio::test]
    async fn corrupt_profile_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(dir.path());
        let user = test_user();

        let path = dir.path().join("test-user.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let profile = store.load(&user).await.unwrap();
        assert!(profile.is_empty());
    }

    #[tokio::test]
    async fn save_overwrites_atomically() {
        let dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(dir.path());
        let user = test_user();

        let mut first = LongTermProfile::default();
        first.set_level("Price", "mid", 0.1, 1.0);
        store.save(&user, &first).await.unwrap();

        let mut second = LongTermProfile::default();
        second.set_level("Price", "mid", 0.9, 0.5);
        store.save(&user, &second).await.unwrap();

        let loaded = store.load(&user).await.unwrap();
        assert_eq!(loaded, second);
        // No leftover temp file.
        assert!(!dir.path().join("test-user.json.tmp").exists());
    }

    #[tokio::test]
    async fn users_do_not_share_profiles() {
        let dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(dir.path());

        let alice = UserId::new("alice").unwrap();
        let mut profile = LongTermProfile::default();
        profile.set_level("Speed", "fast", 1.0, 0.1);
        store.save(&alice, &profile).await.unwrap();

        let bob = UserId::new("bob").unwrap();
        assert!(store.load(&bob).await.unwrap().is_empty());
    }
}
