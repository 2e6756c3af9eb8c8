//! Authentication boundary trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::model::{AuthToken, UserIdentity};
use crate::error::{AuthError, MutationError};

/// Successful login: the issued token and the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: AuthToken,
    pub user: UserIdentity,
}

/// Payload for updating the operator's own profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// The backend's authentication endpoints.
///
/// Implementations classify transport failures: a rejected email/password pair is
/// `InvalidCredentials`, a token the backend no longer accepts is `Expired`, anything
/// that prevents the call from completing is `Unreachable`.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a token.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError>;

    /// Returns the identity the token belongs to.
    ///
    /// # Returns
    ///
    /// - `Ok(UserIdentity)`: the token is valid
    /// - `Err(AuthError::Expired)`: the token was rejected
    /// - `Err(_)`: the token could not be checked
    async fn get_profile(&self, token: &AuthToken) -> Result<UserIdentity, AuthError>;

    /// Replaces the operator's profile and returns the stored identity.
    async fn update_profile(
        &self,
        token: &AuthToken,
        draft: &ProfileDraft,
    ) -> Result<UserIdentity, MutationError>;
}
