//! Administrative user entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Resource, ResourceId, ResourceKind, SearchFields};

/// An operator account of the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: ResourceId,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    pub email: String,
    #[serde(default, alias = "isOwner", alias = "is_owner")]
    pub owner: bool,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Create/update payload for an operator account.
///
/// `password` is required on creation and omitted on update when unchanged.
#[derive(Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub owner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl fmt::Debug for AdminUserDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminUserDraft")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("owner", &self.owner)
            .field("photo", &self.photo)
            .finish()
    }
}

fn first_name(u: &AdminUser) -> Option<&str> {
    Some(u.first_name.as_str())
}

fn last_name(u: &AdminUser) -> Option<&str> {
    Some(u.last_name.as_str())
}

fn email(u: &AdminUser) -> Option<&str> {
    Some(u.email.as_str())
}

impl Resource for AdminUser {
    type Draft = AdminUserDraft;

    const KIND: ResourceKind = ResourceKind::AdminUser;

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn search_fields() -> SearchFields<Self> {
        SearchFields::new()
            .field("first_name", first_name)
            .field("last_name", last_name)
            .field("email", email)
    }
}
