//! HTTP implementation of [`ResourceRepository`].

use async_trait::async_trait;
use reqwest::Method;
use std::marker::PhantomData;
use std::sync::Arc;

use super::endpoints::Endpoints;
use super::transport::HttpTransport;
use crm_core::error::{FetchError, MutationError};
use crm_core::resource::{Resource, ResourceId, ResourceRepository};
use crm_core::session::CredentialSource;

/// Repository for one entity type, authenticated with the current session token.
///
/// Every response is decoded against `T`'s schema; a mismatch is reported as
/// `MalformedResponse` rather than passed on.
pub struct HttpResourceRepository<T> {
    transport: HttpTransport,
    credentials: Arc<dyn CredentialSource>,
    endpoints: Endpoints,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> HttpResourceRepository<T> {
    pub fn new(transport: HttpTransport, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            transport,
            credentials,
            endpoints: Endpoints::for_kind(T::KIND),
            _resource: PhantomData,
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let token = self.credentials.bearer_token();
        self.transport.request(method, path, token.as_ref())
    }
}

#[async_trait]
impl<T: Resource> ResourceRepository<T> for HttpResourceRepository<T> {
    async fn list_all(&self) -> Result<Vec<T>, FetchError> {
        let path = self.endpoints.collection();
        self.transport
            .fetch(self.request(Method::GET, path))
            .await
            .map_err(|failure| failure.into_fetch_error(path))
    }

    async fn get_by_id(&self, id: &ResourceId) -> Result<T, FetchError> {
        let path = self.endpoints.item(id);
        self.transport
            .fetch(self.request(Method::GET, &path))
            .await
            .map_err(|failure| failure.into_fetch_error(&path))
    }

    async fn create(&self, draft: &T::Draft) -> Result<T, MutationError> {
        let path = self.endpoints.create();
        self.transport
            .fetch(self.request(Method::POST, path).json(draft))
            .await
            .map_err(|failure| failure.into_mutation_error(path))
    }

    async fn update(&self, id: &ResourceId, draft: &T::Draft) -> Result<T, MutationError> {
        let path = self.endpoints.item(id);
        self.transport
            .fetch(self.request(Method::PUT, &path).json(draft))
            .await
            .map_err(|failure| failure.into_mutation_error(&path))
    }

    async fn remove(&self, id: &ResourceId) -> Result<(), MutationError> {
        let path = self.endpoints.item(id);
        self.transport
            .send(self.request(Method::DELETE, &path))
            .await
            .map_err(|failure| failure.into_mutation_error(&path))
    }
}
