//! The application-wide authentication state.
//!
//! `SessionStore` is the single owner of the [`Session`]. Its own operations are the only
//! writers (serialized by an async writer lock); readers observe the state through a
//! `tokio::sync::watch` channel and never take that lock. The one exception is
//! [`SessionEscalation::escalate_unauthorized`], which flips `Authenticated` to `Invalid`
//! atomically on the channel so that a controller can force re-authentication while
//! another operation is in flight. A generation counter lets in-flight operations notice
//! that the session changed under them and drop their result.
//!
//! Persistence ordering: the token is written before memory becomes `Authenticated`,
//! and cleared before memory leaves it on logout or detected expiry.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::timeout::bounded;
use crm_core::error::{AuthError, MutationError};
use crm_core::session::{
    AuthApi, AuthToken, CredentialSource, PersistedSession, ProfileDraft, Session,
    SessionEscalation, SessionStatus, TokenStore, UserIdentity,
};

/// What `restore()` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No persisted token; the session stays `Anonymous`.
    NoSession,
    /// Optimistically `Authenticated` from the cached identity; re-validation pending.
    Restored,
    /// A token without cached identity; `Authenticating` until re-validated.
    PendingValidation,
    /// The session was already past `Anonymous`; nothing was read.
    Skipped,
}

pub struct SessionStore {
    state: watch::Sender<Session>,
    generation: AtomicU64,
    writer: Mutex<()>,
    auth_api: Arc<dyn AuthApi>,
    token_store: Arc<dyn TokenStore>,
    call_timeout: Duration,
}

impl SessionStore {
    /// Creates an `Anonymous` store.
    ///
    /// # Arguments
    ///
    /// * `auth_api` - The backend's authentication endpoints
    /// * `token_store` - Durable storage for the session token
    /// * `call_timeout` - Bound on every authentication call
    pub fn new(
        auth_api: Arc<dyn AuthApi>,
        token_store: Arc<dyn TokenStore>,
        call_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(Session::anonymous());
        Self {
            state,
            generation: AtomicU64::new(0),
            writer: Mutex::new(()),
            auth_api,
            token_store,
            call_timeout,
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.state.borrow().user().cloned()
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Publishes `next` if the state machine allows it.
    fn commit(&self, next: Session) {
        let from = self.status();
        let to = next.status();
        if !from.can_transition_to(to) {
            error!(%from, %to, "Refusing illegal session transition");
            return;
        }
        self.state.send_replace(next);
        if from != to {
            info!(%from, %to, "Session transition");
        }
    }

    async fn persist(&self, session: &PersistedSession) {
        if let Err(e) = self.token_store.save(session).await {
            error!(error = %e, "Failed to persist session; it will not survive a restart");
        }
    }

    async fn clear_persisted(&self) {
        if let Err(e) = self.token_store.clear().await {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }

    /// Flips `Authenticated` to `Invalid` in one step. Returns true if this call did it.
    fn invalidate_in_memory(&self) -> bool {
        let flipped = self.state.send_if_modified(|session| {
            if session.is_authenticated() {
                *session = Session::invalid();
                true
            } else {
                false
            }
        });
        if flipped {
            self.bump_generation();
            warn!("Backend rejected the session token; re-authentication required");
        }
        flipped
    }

    /// Authenticates with email and password.
    ///
    /// Moves to `Authenticating` immediately, then to `Authenticated` on success or
    /// `Invalid` on failure (clearing any persisted token).
    ///
    /// # Errors
    ///
    /// - `EmptyCredentials` if either field is blank (no transition)
    /// - `IllegalTransition` if the session is `Authenticating` or `Authenticated`
    /// - `InvalidCredentials` / `Unreachable` / `MalformedResponse` from the backend
    pub async fn login(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyCredentials);
        }

        let _writer = self.writer.lock().await;
        let from = self.status();
        if !from.can_transition_to(SessionStatus::Authenticating) {
            return Err(AuthError::IllegalTransition { from });
        }

        self.bump_generation();
        self.commit(Session::authenticating(None));

        let outcome = bounded(
            self.call_timeout,
            self.auth_api.login(email, password),
            AuthError::Unreachable,
        )
        .await;

        match outcome {
            Ok(response) => {
                self.persist(&PersistedSession::new(
                    response.token.clone(),
                    Some(response.user.clone()),
                ))
                .await;
                info!(user_id = %response.user.id, "Login succeeded");
                self.commit(Session::authenticated(response.user.clone(), response.token));
                Ok(response.user)
            }
            Err(err) => {
                warn!(error = %err, "Login failed");
                self.clear_persisted().await;
                self.commit(Session::invalid());
                Err(err)
            }
        }
    }

    /// Reads the persisted token, once, at process start.
    ///
    /// With a cached identity the session becomes `Authenticated` right away; without
    /// one it stays `Authenticating`. Either way call [`Self::refresh_profile`] (or use
    /// [`Self::boot`]) to re-validate the token.
    pub async fn restore(&self) -> RestoreOutcome {
        let _writer = self.writer.lock().await;
        if self.status() != SessionStatus::Anonymous {
            debug!(status = %self.status(), "Restore skipped");
            return RestoreOutcome::Skipped;
        }

        let persisted = match self.token_store.load().await {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                debug!("No persisted session");
                return RestoreOutcome::NoSession;
            }
            Err(e) => {
                warn!(error = %e, "Persisted session unreadable; discarding it");
                self.clear_persisted().await;
                return RestoreOutcome::NoSession;
            }
        };

        self.bump_generation();
        self.commit(Session::authenticating(Some(persisted.token.clone())));

        match persisted.user {
            Some(user) => {
                info!(user_id = %user.id, "Session restored from cache");
                self.commit(Session::authenticated(user, persisted.token));
                RestoreOutcome::Restored
            }
            None => RestoreOutcome::PendingValidation,
        }
    }

    /// Restores the persisted session and re-validates it against the backend.
    pub async fn boot(&self) -> SessionStatus {
        match self.restore().await {
            RestoreOutcome::Restored | RestoreOutcome::PendingValidation => {
                if let Err(e) = self.refresh_profile().await {
                    debug!(error = %e, "Re-validation did not confirm the session");
                }
            }
            RestoreOutcome::NoSession | RestoreOutcome::Skipped => {}
        }
        self.status()
    }

    /// Re-reads the operator's identity with the current token.
    ///
    /// On success the identity is superseded wholesale and re-cached. A rejected token
    /// moves the session to `Invalid` and clears storage. When the backend cannot be
    /// reached, an already `Authenticated` session keeps its cached identity; a session
    /// still `Authenticating` becomes `Invalid` but keeps the token for the next start.
    pub async fn refresh_profile(&self) -> Result<UserIdentity, AuthError> {
        let _writer = self.writer.lock().await;
        let session = self.session();
        let token = match (session.status(), session.token()) {
            (SessionStatus::Authenticated | SessionStatus::Authenticating, Some(token)) => {
                token.clone()
            }
            (from, _) => return Err(AuthError::IllegalTransition { from }),
        };

        let generation = self.generation();
        let outcome = bounded(
            self.call_timeout,
            self.auth_api.get_profile(&token),
            AuthError::Unreachable,
        )
        .await;

        if self.generation() != generation {
            debug!("Profile response dropped; the session changed meanwhile");
            return Err(AuthError::Expired);
        }

        match outcome {
            Ok(user) => {
                self.persist(&PersistedSession::new(token.clone(), Some(user.clone())))
                    .await;
                self.commit(Session::authenticated(user.clone(), token));
                Ok(user)
            }
            Err(err @ (AuthError::Expired | AuthError::InvalidCredentials)) => {
                warn!("Persisted session rejected by the backend");
                self.clear_persisted().await;
                self.bump_generation();
                self.commit(Session::invalid());
                Err(err)
            }
            Err(err) => {
                if session.is_authenticated() {
                    warn!(error = %err, "Could not re-validate session; keeping cached identity");
                } else {
                    warn!(error = %err, "Could not re-validate session; token kept for next start");
                    self.bump_generation();
                    self.commit(Session::invalid_with_token(token));
                }
                Err(err)
            }
        }
    }

    /// Replaces the operator's profile; the returned identity supersedes the current one.
    pub async fn update_profile(&self, draft: &ProfileDraft) -> Result<UserIdentity, MutationError> {
        let _writer = self.writer.lock().await;
        let session = self.session();
        let token: AuthToken = match (session.is_authenticated(), session.token()) {
            (true, Some(token)) => token.clone(),
            _ => return Err(MutationError::Unauthorized),
        };

        let generation = self.generation();
        let outcome = bounded(
            self.call_timeout,
            self.auth_api.update_profile(&token, draft),
            MutationError::Unreachable,
        )
        .await;

        match outcome {
            Ok(user) if self.generation() == generation => {
                self.persist(&PersistedSession::new(token.clone(), Some(user.clone())))
                    .await;
                info!(user_id = %user.id, "Profile updated");
                self.commit(Session::authenticated(user.clone(), token));
                Ok(user)
            }
            Ok(user) => {
                debug!("Profile update landed after the session changed; identity not applied");
                Ok(user)
            }
            Err(MutationError::Unauthorized) => {
                if self.invalidate_in_memory() {
                    self.clear_persisted().await;
                }
                Err(MutationError::Unauthorized)
            }
            Err(err) => Err(err),
        }
    }

    /// Signs out: clears the persisted token, then memory. Idempotent.
    pub async fn logout(&self) {
        let _writer = self.writer.lock().await;
        self.clear_persisted().await;
        if self.status() == SessionStatus::Anonymous {
            debug!("Logout on an anonymous session");
            return;
        }
        self.bump_generation();
        self.commit(Session::anonymous());
    }
}

#[async_trait]
impl SessionEscalation for SessionStore {
    async fn escalate_unauthorized(&self) -> bool {
        if !self.invalidate_in_memory() {
            debug!("Unauthorized response ignored; session already signed out");
            return false;
        }
        let _writer = self.writer.lock().await;
        if self.status() == SessionStatus::Invalid {
            self.clear_persisted().await;
        }
        true
    }
}

impl CredentialSource for SessionStore {
    fn bearer_token(&self) -> Option<AuthToken> {
        self.state.borrow().token().cloned()
    }
}
