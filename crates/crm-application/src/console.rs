//! Composition root for the admin client.
//!
//! Wires the HTTP boundaries, the token file, the session store and one repository per
//! entity type. Screens get a fresh [`ResourceListController`] each time they open.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::auth_gate::{AuthGate, RouteTable};
use crate::channel::Interaction;
use crate::list_controller::ResourceListController;
use crate::session_store::SessionStore;
use crm_core::error::CrmError;
use crm_core::resource::{AdminUser, Contact, Organization, Resource, ResourceRepository};
use crm_core::session::{AuthApi, CredentialSource, SessionStatus, TokenStore};
use crm_infrastructure::{
    ClientConfig, CrmPaths, HttpAuthApi, HttpResourceRepository, HttpTransport, TomlTokenStore,
};

/// One repository per entity type.
#[derive(Clone)]
pub struct Repositories {
    pub contacts: Arc<dyn ResourceRepository<Contact>>,
    pub organizations: Arc<dyn ResourceRepository<Organization>>,
    pub users: Arc<dyn ResourceRepository<AdminUser>>,
}

pub struct AdminConsole {
    session: Arc<SessionStore>,
    routes: RouteTable,
    repositories: Repositories,
    interaction: Interaction,
    call_timeout: Duration,
}

impl AdminConsole {
    /// Builds the console against the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns `CrmError::Config` if the HTTP client cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        paths: &CrmPaths,
        interaction: Interaction,
    ) -> Result<Self, CrmError> {
        let transport = HttpTransport::new(config.api_base_url.clone(), config.request_timeout())?;
        let session_file = config.session_file(paths);
        info!(
            base_url = transport.base_url(),
            session_file = %session_file.display(),
            "Building admin console"
        );

        let auth_api: Arc<dyn AuthApi> = Arc::new(HttpAuthApi::new(transport.clone()));
        let token_store: Arc<dyn TokenStore> = Arc::new(TomlTokenStore::new(session_file));
        let session = Arc::new(SessionStore::new(
            auth_api,
            token_store,
            config.request_timeout(),
        ));

        let credentials: Arc<dyn CredentialSource> = session.clone();
        let repositories = Repositories {
            contacts: Arc::new(HttpResourceRepository::new(
                transport.clone(),
                credentials.clone(),
            )),
            organizations: Arc::new(HttpResourceRepository::new(
                transport.clone(),
                credentials.clone(),
            )),
            users: Arc::new(HttpResourceRepository::new(transport, credentials)),
        };

        Ok(Self::new(
            session,
            repositories,
            interaction,
            config.request_timeout(),
        ))
    }

    pub fn new(
        session: Arc<SessionStore>,
        repositories: Repositories,
        interaction: Interaction,
        call_timeout: Duration,
    ) -> Self {
        Self {
            session,
            routes: RouteTable::default(),
            repositories,
            interaction,
            call_timeout,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn gate(&self) -> AuthGate {
        AuthGate::new(self.routes.clone(), self.session.subscribe())
    }

    /// Restores and re-validates the persisted session.
    pub async fn boot(&self) -> SessionStatus {
        self.session.boot().await
    }

    fn controller<T: Resource>(
        &self,
        repository: &Arc<dyn ResourceRepository<T>>,
    ) -> ResourceListController<T> {
        ResourceListController::new(
            repository.clone(),
            self.session.clone(),
            self.interaction.clone(),
            self.call_timeout,
        )
    }

    pub fn contacts(&self) -> ResourceListController<Contact> {
        self.controller(&self.repositories.contacts)
    }

    pub fn organizations(&self) -> ResourceListController<Organization> {
        self.controller(&self.repositories.organizations)
    }

    pub fn users(&self) -> ResourceListController<AdminUser> {
        self.controller(&self.repositories.users)
    }
}
