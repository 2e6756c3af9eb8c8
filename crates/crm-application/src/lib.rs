//! Application layer for the CRM admin client.
//!
//! The session store owns authentication state, the gate decides navigation from it,
//! and list controllers keep each resource screen in sync with the backend.

pub mod auth_gate;
pub mod channel;
pub mod console;
pub mod list_controller;
pub mod session_store;
mod timeout;

#[cfg(test)]
mod test_support;

pub use auth_gate::{AuthGate, GateDecision, RouteTable, decide};
pub use channel::{
    AutoConfirmer, ChannelConfirmer, ChannelNotifier, ConfirmationRequest, Interaction,
};
pub use console::{AdminConsole, Repositories};
pub use list_controller::{RemoveOutcome, ResourceListController};
pub use session_store::{RestoreOutcome, SessionStore};
