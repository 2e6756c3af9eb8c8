//! reqwest-based implementations of the backend boundaries.

pub mod auth_api;
mod endpoints;
pub mod resource_repository;
pub mod transport;

pub use auth_api::HttpAuthApi;
pub use resource_repository::HttpResourceRepository;
pub use transport::HttpTransport;
