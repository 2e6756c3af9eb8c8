//! Session model.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resource::ResourceId;

/// Lifecycle of the operator's authentication.
///
/// ```text
/// Anonymous ──▶ Authenticating ──▶ Authenticated ──▶ Invalid
///                  ▲      │              │              │
///                  │      └──▶ Invalid   └──▶ Anonymous │
///                  └────────────────────────────────────┘
/// ```
///
/// Logout may move any status to `Anonymous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
    Invalid,
}

impl SessionStatus {
    /// Returns true if the state machine allows moving from `self` to `next`.
    ///
    /// A status may always "transition" to itself; an `Authenticated` session uses this
    /// when its identity is superseded by a profile refresh.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        use SessionStatus::*;

        if self == next || next == Anonymous {
            return true;
        }
        matches!(
            (self, next),
            (Anonymous, Authenticating)
                | (Invalid, Authenticating)
                | (Authenticating, Authenticated)
                | (Authenticating, Invalid)
                | (Authenticated, Invalid)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque bearer token issued by the backend.
///
/// `Debug` is redacted so the token never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Snapshot of the authenticated operator.
///
/// Taken at login or restore time and replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: ResourceId,
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "last_name")]
    pub last_name: String,
    pub email: String,
    #[serde(default, alias = "owner", alias = "is_owner")]
    pub is_owner: bool,
}

impl UserIdentity {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Authentication state of the running client.
///
/// Fields are private: `user` and `token` are both present exactly when the status is
/// `Authenticated`, and the constructors are the only way to build a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    status: SessionStatus,
    user: Option<UserIdentity>,
    token: Option<AuthToken>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A login or restore in progress. A restore carries the persisted token so it can
    /// be re-validated; a fresh login has none yet.
    pub fn authenticating(token: Option<AuthToken>) -> Self {
        Self {
            status: SessionStatus::Authenticating,
            user: None,
            token,
        }
    }

    pub fn authenticated(user: UserIdentity, token: AuthToken) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user: Some(user),
            token: Some(token),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: SessionStatus::Invalid,
            user: None,
            token: None,
        }
    }

    /// An `Invalid` session that still remembers the persisted token.
    ///
    /// Used when re-validation could not reach the backend and no cached identity
    /// exists: the token is kept so a later restart can retry.
    pub fn invalid_with_token(token: AuthToken) -> Self {
        Self {
            status: SessionStatus::Invalid,
            user: None,
            token: Some(token),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

/// What survives a restart: the token plus the identity cached with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    pub token: AuthToken,
    pub user: Option<UserIdentity>,
}

impl PersistedSession {
    pub fn new(token: AuthToken, user: Option<UserIdentity>) -> Self {
        Self { token, user }
    }
}
