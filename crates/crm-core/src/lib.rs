//! Domain layer for the CRM admin client.
//!
//! Holds the session model, the entity schemas, the list state machine and the
//! trait seams (authentication boundary, resource repositories, token storage,
//! operator interaction) that the infrastructure and application crates plug
//! into.

pub mod error;
pub mod interaction;
pub mod resource;
pub mod session;

pub use error::{AuthError, CrmError, ErrorDescriptor, ErrorKind, FetchError, MutationError};
