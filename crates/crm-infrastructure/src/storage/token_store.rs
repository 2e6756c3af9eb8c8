//! TOML-backed session token store.
//!
//! The persisted session lives in one owner-only file (`session.toml`). Every write
//! replaces the whole record atomically, so a crash leaves either the previous record
//! or the new one on disk.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use super::atomic_toml::AtomicTomlFile;
use crm_core::error::{CrmError, Result};
use crm_core::session::{AuthToken, PersistedSession, TokenStore, UserIdentity};

const SESSION_RECORD_VERSION: u32 = 1;

/// On-disk shape of the session file.
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    version: u32,
    token: AuthToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserIdentity>,
}

impl From<&PersistedSession> for SessionRecord {
    fn from(session: &PersistedSession) -> Self {
        Self {
            version: SESSION_RECORD_VERSION,
            token: session.token.clone(),
            user: session.user.clone(),
        }
    }
}

/// A [`TokenStore`] persisting the session as a TOML file.
#[derive(Clone)]
pub struct TomlTokenStore {
    file: Arc<AtomicTomlFile<SessionRecord>>,
}

impl TomlTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path).private()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    async fn blocking<R, F>(&self, op: F) -> Result<R>
    where
        F: FnOnce(&AtomicTomlFile<SessionRecord>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || op(&file))
            .await
            .map_err(|e| CrmError::internal(format!("session file task failed: {e}")))?
    }
}

#[async_trait]
impl TokenStore for TomlTokenStore {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        let record = self.blocking(|file| Ok(file.load()?)).await?;

        Ok(match record {
            Some(record) if record.version != SESSION_RECORD_VERSION => {
                warn!(
                    version = record.version,
                    "Ignoring session file with unsupported version"
                );
                None
            }
            Some(record) if record.token.is_empty() => {
                debug!("Ignoring session file without a token");
                None
            }
            Some(record) => Some(PersistedSession::new(record.token, record.user)),
            None => None,
        })
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        let record = SessionRecord::from(session);
        self.blocking(move |file| Ok(file.save(&record)?)).await?;
        debug!(path = %self.file.path().display(), "Session persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.blocking(|file| Ok(file.remove()?)).await?;
        debug!(path = %self.file.path().display(), "Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::resource::ResourceId;
    use tempfile::TempDir;

    fn identity() -> UserIdentity {
        UserIdentity {
            id: ResourceId::from("17"),
            first_name: "Margaret".into(),
            last_name: "Hamilton".into(),
            email: "margaret@example.com".into(),
            is_owner: false,
        }
    }

    #[tokio::test]
    async fn test_save_then_load_in_a_new_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");

        let session = PersistedSession::new(AuthToken::new("tok-1"), Some(identity()));
        TomlTokenStore::new(path.clone()).save(&session).await.unwrap();

        let restored = TomlTokenStore::new(path).load().await.unwrap();
        assert_eq!(restored, Some(session));
    }

    #[tokio::test]
    async fn test_token_without_identity() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlTokenStore::new(temp_dir.path().join("session.toml"));

        let session = PersistedSession::new(AuthToken::new("tok-2"), None);
        store.save(&session).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_clear_removes_the_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlTokenStore::new(temp_dir.path().join("session.toml"));

        store
            .save(&PersistedSession::new(AuthToken::new("tok"), None))
            .await
            .unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert!(store.load().await.unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_unknown_version_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        std::fs::write(&path, "version = 99\ntoken = \"tok\"\n").unwrap();

        let store = TomlTokenStore::new(path);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        std::fs::write(&path, "token = [").unwrap();

        let err = TomlTokenStore::new(path).load().await.unwrap_err();
        assert!(err.is_serialization());
    }
}
