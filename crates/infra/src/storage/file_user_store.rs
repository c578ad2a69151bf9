//! User profile cache stored as a JSON file

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ignitegym_core::UserStore;
use ignitegym_domain::{Result as DomainResult, UserProfile};
use tokio::fs;
use tracing::debug;

use crate::errors::InfraError;

/// JSON-file implementation of `UserStore`
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target,
/// so a crash mid-write never leaves a truncated profile behind.
#[derive(Debug, Clone)]
pub struct FileUserStore {
    path: PathBuf,
}

impl FileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn get(&self) -> DomainResult<Option<UserProfile>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(InfraError::from(err).into()),
        };

        let user = serde_json::from_slice(&bytes).map_err(InfraError::from)?;
        Ok(Some(user))
    }

    async fn save(&self, user: &UserProfile) -> DomainResult<()> {
        let bytes = serde_json::to_vec_pretty(user).map_err(InfraError::from)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }

        let temp = self.temp_path();
        fs::write(&temp, bytes).await.map_err(InfraError::from)?;
        fs::rename(&temp, &self.path).await.map_err(InfraError::from)?;

        debug!(path = %self.path.display(), "user profile saved");
        Ok(())
    }

    async fn remove(&self) -> DomainResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "user profile removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use ignitegym_domain::IgniteError;
    use tempfile::TempDir;

    use super::*;

    fn profile() -> UserProfile {
        UserProfile::new("user-1", "Ana", "ana@example.com")
    }

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileUserStore::new(dir.path().join("user.json"));

        assert_eq!(store.get().await.expect("read"), None);
    }

    #[tokio::test]
    async fn save_then_get_returns_profile() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileUserStore::new(dir.path().join("nested").join("user.json"));

        store.save(&profile()).await.expect("save");

        assert_eq!(store.get().await.expect("read"), Some(profile()));
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn save_overwrites_previous_profile() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileUserStore::new(dir.path().join("user.json"));
        store.save(&profile()).await.expect("save");

        let mut updated = profile();
        updated.avatar = Some("ana.png".to_string());
        store.save(&updated).await.expect("overwrite");

        assert_eq!(store.get().await.expect("read"), Some(updated));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileUserStore::new(dir.path().join("user.json"));
        store.save(&profile()).await.expect("save");

        store.remove().await.expect("remove");
        store.remove().await.expect("remove again");

        assert_eq!(store.get().await.expect("read"), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_serialization_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("user.json");
        std::fs::write(&path, b"{not json").expect("write");

        let err = FileUserStore::new(path).get().await.expect_err("corrupt");

        assert!(matches!(err, IgniteError::Serialization(_)));
    }
}
