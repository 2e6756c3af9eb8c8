//! Infrastructure for the CRM admin client: HTTP access to the backend, the on-disk
//! session and configuration files, and path resolution.

pub mod config;
pub mod http;
pub mod paths;
pub mod storage;

pub use crate::config::{ClientConfig, ConfigLoader};
pub use crate::http::{HttpAuthApi, HttpResourceRepository, HttpTransport};
pub use crate::paths::CrmPaths;
pub use crate::storage::TomlTokenStore;
