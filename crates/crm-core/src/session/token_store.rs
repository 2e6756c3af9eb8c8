//! Durable storage for the session token.

use async_trait::async_trait;

use super::model::PersistedSession;
use crate::error::Result;

/// An abstract store holding the one persisted session record.
///
/// # Implementation Notes
///
/// `save` and `clear` must each be atomic: a reader sees either the previous record or
/// the new one, never a partial write.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Reads the persisted session.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(PersistedSession))`: a session was persisted
    /// - `Ok(None)`: nothing is stored
    /// - `Err(_)`: the record exists but could not be read
    async fn load(&self) -> Result<Option<PersistedSession>>;

    /// Replaces the persisted session.
    async fn save(&self, session: &PersistedSession) -> Result<()>;

    /// Removes the persisted session. Succeeds when nothing is stored.
    async fn clear(&self) -> Result<()>;
}
