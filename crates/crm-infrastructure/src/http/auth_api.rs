//! HTTP implementation of the authentication boundary.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use super::endpoints;
use super::transport::HttpTransport;
use crm_core::error::{AuthError, MutationError};
use crm_core::session::{AuthApi, AuthToken, LoginResponse, ProfileDraft, UserIdentity};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// [`AuthApi`] over the backend's `/admin-users` endpoints.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    transport: HttpTransport,
}

impl HttpAuthApi {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        debug!(email, "Sending login request");
        let request = self
            .transport
            .request(Method::POST, endpoints::LOGIN, None)
            .json(&LoginRequest { email, password });

        let response: LoginResponse = self
            .transport
            .fetch(request)
            .await
            .map_err(|failure| failure.into_login_error())?;

        if response.token.is_empty() {
            return Err(AuthError::malformed("login response carries an empty token"));
        }
        Ok(response)
    }

    async fn get_profile(&self, token: &AuthToken) -> Result<UserIdentity, AuthError> {
        let request = self
            .transport
            .request(Method::GET, endpoints::PROFILE, Some(token));

        self.transport
            .fetch(request)
            .await
            .map_err(|failure| failure.into_token_error())
    }

    async fn update_profile(
        &self,
        token: &AuthToken,
        draft: &ProfileDraft,
    ) -> Result<UserIdentity, MutationError> {
        let request = self
            .transport
            .request(Method::PUT, endpoints::PROFILE_UPDATE, Some(token))
            .json(draft);

        self.transport
            .fetch(request)
            .await
            .map_err(|failure| failure.into_mutation_error(endpoints::PROFILE_UPDATE))
    }
}
