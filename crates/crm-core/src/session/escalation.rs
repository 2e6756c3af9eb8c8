//! Seams between list controllers and the session.
//!
//! Controllers never see the session store itself; they get a way to read the bearer
//! token and a way to report that the backend rejected it.

use async_trait::async_trait;

use super::model::AuthToken;

/// Receives `Unauthorized` failures observed outside the session store.
#[async_trait]
pub trait SessionEscalation: Send + Sync {
    /// Forces the session to `Invalid`.
    ///
    /// Returns true only for the call that performed the transition; every later call
    /// (from this or any other controller) returns false.
    async fn escalate_unauthorized(&self) -> bool;
}

/// Supplies the bearer token for repository calls.
pub trait CredentialSource: Send + Sync {
    fn bearer_token(&self) -> Option<AuthToken>;
}
