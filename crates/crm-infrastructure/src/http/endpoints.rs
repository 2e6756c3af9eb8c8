//! Backend paths, relative to the configured base URL.

use crm_core::resource::{ResourceId, ResourceKind};

pub(crate) const LOGIN: &str = "/admin-users/login";
pub(crate) const PROFILE: &str = "/admin-users/";
pub(crate) const PROFILE_UPDATE: &str = "/admin-users";

/// Paths of one resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Endpoints {
    collection: &'static str,
    create: &'static str,
}

impl Endpoints {
    pub(crate) fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Contact => Self {
                collection: "/contacts",
                create: "/contacts",
            },
            ResourceKind::Organization => Self {
                collection: "/organizations",
                create: "/organizations",
            },
            // Operator accounts are registered rather than posted to the collection.
            ResourceKind::AdminUser => Self {
                collection: "/admin-users",
                create: "/admin-users/register",
            },
        }
    }

    pub(crate) fn collection(&self) -> &'static str {
        self.collection
    }

    pub(crate) fn create(&self) -> &'static str {
        self.create
    }

    pub(crate) fn item(&self, id: &ResourceId) -> String {
        format!("{}/{}", self.collection, id)
    }
}
