//! Session domain: the authentication state machine, the operator identity and the
//! seams through which the session is authenticated, persisted and escalated.

pub mod auth_api;
pub mod escalation;
pub mod model;
pub mod token_store;

pub use auth_api::{AuthApi, LoginResponse, ProfileDraft};
pub use escalation::{CredentialSource, SessionEscalation};
pub use model::{AuthToken, PersistedSession, Session, SessionStatus, UserIdentity};
pub use token_store::TokenStore;
