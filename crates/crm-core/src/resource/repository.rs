//! Resource repository trait.

use async_trait::async_trait;

use super::{Resource, ResourceId};
use crate::error::{FetchError, MutationError};

/// The verb-based calls a list or edit screen issues for one entity type.
///
/// This trait decouples the controllers from the transport. Implementations are
/// responsible for attaching credentials and for checking every response against the
/// entity schema (`MalformedResponse` on mismatch).
#[async_trait]
pub trait ResourceRepository<T: Resource>: Send + Sync {
    /// Lists the whole collection in server order.
    async fn list_all(&self) -> Result<Vec<T>, FetchError>;

    /// Fetches one record.
    async fn get_by_id(&self, id: &ResourceId) -> Result<T, FetchError>;

    /// Creates a record and returns it as stored by the server.
    async fn create(&self, draft: &T::Draft) -> Result<T, MutationError>;

    /// Replaces a record and returns it as stored by the server.
    async fn update(&self, id: &ResourceId, draft: &T::Draft) -> Result<T, MutationError>;

    /// Deletes a record.
    async fn remove(&self, id: &ResourceId) -> Result<(), MutationError>;
}
