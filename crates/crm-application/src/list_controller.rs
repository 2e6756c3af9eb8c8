//! List screen controller for one resource type.
//!
//! Owns a [`ListState`] and drives it against a [`ResourceRepository`]: fetches are
//! tagged with an epoch so only the latest response is applied, mutations ask the
//! operator first where they destroy data and re-fetch afterwards, and any
//! `Unauthorized` answer is escalated to the session exactly as-is.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::channel::Interaction;
use crate::timeout::bounded;
use crm_core::error::{ErrorDescriptor, FetchError, MutationError};
use crm_core::interaction::{ConfirmPrompt, Notice};
use crm_core::resource::{
    Epoch, FetchResolution, ListPhase, ListState, ListView, Resource, ResourceId, ResourceKind,
    ResourceRepository,
};
use crm_core::session::SessionEscalation;

/// Result of a confirmed removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The operator declined; nothing was sent.
    Cancelled,
    /// The record is gone; `resync` is how the follow-up refresh resolved.
    Removed { resync: FetchResolution },
    /// The controller was disposed before the removal could be issued.
    Disposed,
}

struct Inner<T: Resource> {
    state: Mutex<ListState<T>>,
    repository: Arc<dyn ResourceRepository<T>>,
    session: Arc<dyn SessionEscalation>,
    interaction: Interaction,
    call_timeout: Duration,
}

/// Handle to one list screen. Clones share the same state.
pub struct ResourceListController<T: Resource> {
    inner: Arc<Inner<T>>,
}

impl<T: Resource> Clone for ResourceListController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Resource> ResourceListController<T> {
    pub fn new(
        repository: Arc<dyn ResourceRepository<T>>,
        session: Arc<dyn SessionEscalation>,
        interaction: Interaction,
        call_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ListState::new(T::search_fields())),
                repository,
                session,
                interaction,
                call_timeout,
            }),
        }
    }

    /// The state is only touched synchronously, so a poisoned lock still holds a
    /// consistent value.
    fn state(&self) -> MutexGuard<'_, ListState<T>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn is_disposed(&self) -> bool {
        self.state().is_disposed()
    }

    fn notify(&self, notice: Notice) {
        self.inner.interaction.notifier.notify(notice);
    }

    /// Forwards an `Unauthorized` answer to the session, even after `dispose()`. The
    /// first escalation of a session also tells the operator while the screen is open.
    async fn escalate(&self) {
        if self.inner.session.escalate_unauthorized().await && !self.is_disposed() {
            self.notify(Notice::SessionExpired);
        }
    }

    /// Fetches the whole collection.
    ///
    /// Overlapping calls are allowed: each takes a new epoch and only the response
    /// carrying the latest one is applied.
    pub async fn refresh(&self) -> FetchResolution {
        let Some(epoch) = self.state().begin_fetch() else {
            return FetchResolution::Disposed;
        };
        debug!(kind = %T::KIND, epoch, "Fetching list");

        let outcome = bounded(
            self.inner.call_timeout,
            self.inner.repository.list_all(),
            FetchError::Unreachable,
        )
        .await;

        let rejected = matches!(outcome, Err(FetchError::Unauthorized));
        let resolution = self.state().complete_fetch(epoch, outcome);
        match &resolution {
            FetchResolution::Ready { count } => {
                debug!(kind = %T::KIND, epoch, count, "List loaded");
            }
            FetchResolution::Failed(error) => {
                warn!(kind = %T::KIND, epoch, error = %error, "List fetch failed");
            }
            FetchResolution::Unauthorized => self.escalate().await,
            FetchResolution::Stale => {
                debug!(kind = %T::KIND, epoch, "Dropped superseded list response");
            }
            FetchResolution::Disposed => {
                debug!(kind = %T::KIND, epoch, "Dropped list response after dispose");
            }
        }
        // A dropped response still tells us the token is dead.
        if rejected && matches!(resolution, FetchResolution::Stale | FetchResolution::Disposed) {
            self.escalate().await;
        }
        resolution
    }

    /// Filters the loaded items locally. Never fetches.
    pub fn apply_filter(&self, query: &str) {
        self.state().apply_filter(query);
    }

    pub fn reset_filter(&self) {
        self.state().reset_filter();
    }

    /// Runs `f` against the current render state.
    pub fn with_view<R>(&self, f: impl FnOnce(ListView<'_, T>) -> R) -> R {
        let state = self.state();
        f(state.view())
    }

    pub fn visible(&self) -> Vec<T> {
        self.state().visible().to_vec()
    }

    pub fn items(&self) -> Vec<T> {
        self.state().items().to_vec()
    }

    pub fn phase(&self) -> ListPhase {
        self.state().phase()
    }

    pub fn error(&self) -> Option<ErrorDescriptor> {
        self.state().error().cloned()
    }

    pub fn filter_query(&self) -> String {
        self.state().filter_query().to_string()
    }

    pub fn request_epoch(&self) -> Epoch {
        self.state().request_epoch()
    }

    /// Reads one record. Does not touch the list.
    pub async fn get(&self, id: &ResourceId) -> Result<T, FetchError> {
        let outcome = bounded(
            self.inner.call_timeout,
            self.inner.repository.get_by_id(id),
            FetchError::Unreachable,
        )
        .await;
        if matches!(outcome, Err(FetchError::Unauthorized)) {
            self.escalate().await;
        }
        outcome
    }

    /// Deletes `id` after the operator confirms, then re-fetches the list.
    ///
    /// # Errors
    ///
    /// The repository's error, after it has been reported to the operator (or
    /// escalated, for `Unauthorized`). A failure that lands after `dispose()` is
    /// returned without a notice; `Unauthorized` is still escalated.
    pub async fn remove(&self, id: &ResourceId) -> Result<RemoveOutcome, MutationError> {
        if self.is_disposed() {
            return Ok(RemoveOutcome::Disposed);
        }

        let prompt = ConfirmPrompt::removal(T::KIND, id.clone());
        if !self.inner.interaction.confirmer.confirm(prompt).await {
            debug!(kind = %T::KIND, %id, "Removal cancelled");
            return Ok(RemoveOutcome::Cancelled);
        }
        if self.is_disposed() {
            return Ok(RemoveOutcome::Disposed);
        }

        let outcome = bounded(
            self.inner.call_timeout,
            self.inner.repository.remove(id),
            MutationError::Unreachable,
        )
        .await;

        match outcome {
            Ok(()) => {
                info!(kind = %T::KIND, %id, "Record removed");
                self.notify(Notice::Removed {
                    kind: T::KIND,
                    id: id.clone(),
                });
                let resync = self.refresh().await;
                Ok(RemoveOutcome::Removed { resync })
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// Creates a record and re-fetches the list.
    pub async fn create(&self, draft: &T::Draft) -> Result<T, MutationError> {
        let outcome = bounded(
            self.inner.call_timeout,
            self.inner.repository.create(draft),
            MutationError::Unreachable,
        )
        .await;
        self.finish_save(outcome, |kind, id| Notice::Created { kind, id })
            .await
    }

    /// Updates a record and re-fetches the list.
    pub async fn update(&self, id: &ResourceId, draft: &T::Draft) -> Result<T, MutationError> {
        let outcome = bounded(
            self.inner.call_timeout,
            self.inner.repository.update(id, draft),
            MutationError::Unreachable,
        )
        .await;
        self.finish_save(outcome, |kind, id| Notice::Updated { kind, id })
            .await
    }

    async fn finish_save(
        &self,
        outcome: Result<T, MutationError>,
        notice: fn(ResourceKind, ResourceId) -> Notice,
    ) -> Result<T, MutationError> {
        match outcome {
            Ok(record) => {
                info!(kind = %T::KIND, id = %record.id(), "Record saved");
                self.notify(notice(T::KIND, record.id().clone()));
                self.refresh().await;
                Ok(record)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    async fn report_failure(&self, err: &MutationError) {
        if err.is_unauthorized() {
            self.escalate().await;
            return;
        }
        if self.is_disposed() {
            debug!(kind = %T::KIND, error = %err, "Mutation failed after dispose");
            return;
        }
        warn!(kind = %T::KIND, error = %err, "Mutation failed");
        self.notify(Notice::MutationFailed {
            kind: T::KIND,
            error: ErrorDescriptor::from(err),
        });
    }

    /// Detaches the screen: in-flight and later responses are dropped.
    pub fn dispose(&self) {
        self.state().dispose();
        debug!(kind = %T::KIND, "List disposed");
    }
}
