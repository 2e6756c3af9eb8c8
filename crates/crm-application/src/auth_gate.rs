//! Route guard for the protected admin area.
//!
//! The decision is a pure function of the route table, the session status, and the
//! requested path. [`AuthGate`] only pairs it with a session subscription.

use tokio::sync::watch;

use crm_core::resource::ResourceKind;
use crm_core::session::{Session, SessionStatus};

/// The two route prefixes the gate knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    /// Where unauthenticated visitors are sent.
    pub public_entry: String,
    /// Everything at or below this path requires a session.
    pub protected_root: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            public_entry: "/login".to_string(),
            protected_root: "/dashboard".to_string(),
        }
    }
}

impl RouteTable {
    pub fn is_protected(&self, path: &str) -> bool {
        let root = self.protected_root.trim_end_matches('/');
        path == root
            || path
                .strip_prefix(root)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Path of the list screen for `kind`.
    pub fn screen_path(&self, kind: ResourceKind) -> String {
        format!(
            "{}/{}",
            self.protected_root.trim_end_matches('/'),
            kind.screen_segment()
        )
    }
}

/// What the router should do with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    /// The session is still being established; render a neutral placeholder.
    Placeholder,
    Redirect { to: String },
}

/// Decides a navigation to `path` for a session in `status`.
///
/// A protected path never renders for anything but `Authenticated`, and an
/// authenticated operator visiting the login page is sent to the protected root.
pub fn decide(routes: &RouteTable, status: SessionStatus, path: &str) -> GateDecision {
    if !routes.is_protected(path) {
        if path == routes.public_entry && status == SessionStatus::Authenticated {
            return GateDecision::Redirect {
                to: routes.protected_root.clone(),
            };
        }
        return GateDecision::Render;
    }

    match status {
        SessionStatus::Authenticated => GateDecision::Render,
        SessionStatus::Authenticating => GateDecision::Placeholder,
        SessionStatus::Anonymous | SessionStatus::Invalid => GateDecision::Redirect {
            to: routes.public_entry.clone(),
        },
    }
}

/// Gate bound to a live session.
#[derive(Clone)]
pub struct AuthGate {
    routes: RouteTable,
    session: watch::Receiver<Session>,
}

impl AuthGate {
    pub fn new(routes: RouteTable, session: watch::Receiver<Session>) -> Self {
        Self { routes, session }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decision for the session as it is right now.
    pub fn evaluate(&self, path: &str) -> GateDecision {
        let status = self.session.borrow().status();
        decide(&self.routes, status, path)
    }

    /// Waits until the session leaves `Authenticating`, then decides.
    ///
    /// Returns the current decision immediately if the session is settled, or if the
    /// session store is gone.
    pub async fn settle(&mut self, path: &str) -> GateDecision {
        let settled = self
            .session
            .wait_for(|session| session.status() != SessionStatus::Authenticating)
            .await
            .map(|session| session.status());
        let status = match settled {
            Ok(status) => status,
            Err(_) => self.session.borrow().status(),
        };
        decide(&self.routes, status, path)
    }
}
