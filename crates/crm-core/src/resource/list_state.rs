//! State of one list screen.
//!
//! `ListState` is the pure half of a list controller: it decides which responses are
//! applied (epoch guard), keeps `visible` derived from `items` and the filter query,
//! and exposes the single render state the screen should show. It never performs I/O.

use super::search::SearchFields;
use crate::error::{ErrorDescriptor, FetchError};

/// Sequence number of a fetch issued by one list.
pub type Epoch = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// No fetch has completed yet (or the session was signed out under it).
    Idle,
    Loading,
    Ready,
    Error,
}

/// What the screen renders. Exactly one of these at a time.
#[derive(Debug, PartialEq, Eq)]
pub enum ListView<'a, T> {
    Idle,
    Loading,
    Error(&'a ErrorDescriptor),
    /// The fetch succeeded but nothing is visible (empty collection or no filter match).
    Empty,
    Items(&'a [T]),
}

/// How a fetch response was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResolution {
    /// Items replaced; `count` is the new collection size.
    Ready { count: usize },
    /// The fetch failed and the list shows the error.
    Failed(ErrorDescriptor),
    /// The backend rejected the credentials; the session must be escalated.
    Unauthorized,
    /// A newer fetch superseded this one; the response was dropped.
    Stale,
    /// The list was disposed; the response was dropped.
    Disposed,
}

pub struct ListState<T> {
    items: Vec<T>,
    filter_query: String,
    visible: Vec<T>,
    phase: ListPhase,
    error: Option<ErrorDescriptor>,
    request_epoch: Epoch,
    disposed: bool,
    search: SearchFields<T>,
}

impl<T: Clone> ListState<T> {
    pub fn new(search: SearchFields<T>) -> Self {
        Self {
            items: Vec::new(),
            filter_query: String::new(),
            visible: Vec::new(),
            phase: ListPhase::Idle,
            error: None,
            request_epoch: 0,
            disposed: false,
            search,
        }
    }

    /// Starts a fetch and returns its epoch, or `None` once disposed.
    pub fn begin_fetch(&mut self) -> Option<Epoch> {
        if self.disposed {
            return None;
        }
        self.request_epoch += 1;
        self.phase = ListPhase::Loading;
        self.error = None;
        Some(self.request_epoch)
    }

    /// Applies the response of the fetch started at `epoch`, if it is still current.
    pub fn complete_fetch(
        &mut self,
        epoch: Epoch,
        outcome: Result<Vec<T>, FetchError>,
    ) -> FetchResolution {
        if self.disposed {
            return FetchResolution::Disposed;
        }
        if epoch != self.request_epoch {
            return FetchResolution::Stale;
        }

        match outcome {
            Ok(items) => {
                self.items = items;
                self.recompute_visible();
                self.phase = ListPhase::Ready;
                self.error = None;
                FetchResolution::Ready {
                    count: self.items.len(),
                }
            }
            Err(FetchError::Unauthorized) => {
                // Nothing fetched under a rejected token stays on screen.
                self.items.clear();
                self.visible.clear();
                self.phase = ListPhase::Idle;
                self.error = None;
                FetchResolution::Unauthorized
            }
            Err(err) => {
                let descriptor = ErrorDescriptor::from(&err);
                self.phase = ListPhase::Error;
                self.error = Some(descriptor.clone());
                FetchResolution::Failed(descriptor)
            }
        }
    }

    /// Sets the filter query and recomputes `visible`. Never fetches.
    pub fn apply_filter(&mut self, query: &str) {
        if self.disposed {
            return;
        }
        self.filter_query = query.to_string();
        self.recompute_visible();
    }

    pub fn reset_filter(&mut self) {
        self.apply_filter("");
    }

    /// Makes every outstanding and future response stale.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.request_epoch += 1;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn recompute_visible(&mut self) {
        self.visible = self.search.filter(&self.items, &self.filter_query);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    pub fn filter_query(&self) -> &str {
        &self.filter_query
    }

    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&ErrorDescriptor> {
        self.error.as_ref()
    }

    pub fn request_epoch(&self) -> Epoch {
        self.request_epoch
    }

    pub fn view(&self) -> ListView<'_, T> {
        match (self.phase, &self.error) {
            (ListPhase::Loading, _) => ListView::Loading,
            (ListPhase::Error, Some(error)) => ListView::Error(error),
            (ListPhase::Ready, _) if self.visible.is_empty() => ListView::Empty,
            (ListPhase::Ready, _) => ListView::Items(&self.visible),
            _ => ListView::Idle,
        }
    }
}
