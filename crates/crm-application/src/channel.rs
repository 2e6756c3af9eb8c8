//! Channel-backed [`Confirmer`] and [`Notifier`] implementations.
//!
//! The presentation layer owns the receiving ends: it answers confirmation requests
//! and drains notices on its own schedule.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crm_core::interaction::{ConfirmPrompt, Confirmer, Notice, Notifier};

/// A pending question; answer it with [`approve`](Self::approve) or [`deny`](Self::deny).
///
/// Dropping the request unanswered counts as a denial.
#[derive(Debug)]
pub struct ConfirmationRequest {
    pub prompt: ConfirmPrompt,
    responder: oneshot::Sender<bool>,
}

impl ConfirmationRequest {
    pub fn respond(self, approved: bool) {
        // The controller may have been dropped while the operator was deciding.
        let _ = self.responder.send(approved);
    }

    pub fn approve(self) {
        self.respond(true);
    }

    pub fn deny(self) {
        self.respond(false);
    }
}

/// Forwards prompts to a receiver and waits for the answer.
#[derive(Clone)]
pub struct ChannelConfirmer {
    requests: mpsc::UnboundedSender<ConfirmationRequest>,
}

impl ChannelConfirmer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ConfirmationRequest>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (Self { requests }, rx)
    }
}

#[async_trait]
impl Confirmer for ChannelConfirmer {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        let (responder, answer) = oneshot::channel();
        if self
            .requests
            .send(ConfirmationRequest { prompt, responder })
            .is_err()
        {
            debug!("No one is answering confirmations; treating as denied");
            return false;
        }
        answer.await.unwrap_or(false)
    }
}

/// Approves every prompt. For non-interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirmer;

#[async_trait]
impl Confirmer for AutoConfirmer {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        info!(kind = %prompt.kind, id = %prompt.id, "Confirmation auto-approved");
        true
    }
}

/// Queues notices for the presentation layer.
#[derive(Clone)]
pub struct ChannelNotifier {
    notices: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (notices, rx) = mpsc::unbounded_channel();
        (Self { notices }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.notices.send(notice) {
            debug!(notice = ?e.0, "Notice dropped; receiver closed");
        }
    }
}

/// The operator-facing collaborators every controller receives.
#[derive(Clone)]
pub struct Interaction {
    pub confirmer: Arc<dyn Confirmer>,
    pub notifier: Arc<dyn Notifier>,
}

impl Interaction {
    pub fn new(confirmer: Arc<dyn Confirmer>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            confirmer,
            notifier,
        }
    }
}
