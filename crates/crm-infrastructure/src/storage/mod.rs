//! File-backed storage.

pub mod atomic_toml;
pub mod token_store;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use token_store::TomlTokenStore;
