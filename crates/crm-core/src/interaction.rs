//! Operator interaction: confirmation before destructive operations and non-blocking
//! outcome notices.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ErrorDescriptor;
use crate::resource::{ResourceId, ResourceKind};

/// A question put to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmPrompt {
    pub kind: ResourceKind,
    pub id: ResourceId,
    pub message: String,
}

impl ConfirmPrompt {
    pub fn removal(kind: ResourceKind, id: ResourceId) -> Self {
        let message = format!("Delete {kind} {id}? This cannot be undone.");
        Self { kind, id, message }
    }
}

/// Outcome reports emitted by controllers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    Created {
        kind: ResourceKind,
        id: ResourceId,
    },
    Updated {
        kind: ResourceKind,
        id: ResourceId,
    },
    Removed {
        kind: ResourceKind,
        id: ResourceId,
    },
    MutationFailed {
        kind: ResourceKind,
        error: ErrorDescriptor,
    },
    /// The backend rejected the session; the operator must sign in again.
    SessionExpired,
}

/// Asks the operator before a destructive operation.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Returns true if the operator approved.
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool;
}

/// Delivers notices without waiting for the operator.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
