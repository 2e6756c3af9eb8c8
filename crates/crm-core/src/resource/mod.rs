//! Resources managed through list screens.
//!
//! A [`Resource`] is an entity type with a server-assigned id, a draft payload used to
//! create or update it, and a set of searchable fields used by the client-side filter.

pub mod admin_user;
pub mod contact;
pub mod list_state;
pub mod organization;
pub mod repository;
pub mod search;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub use admin_user::{AdminUser, AdminUserDraft};
pub use contact::{Contact, ContactDraft};
pub use list_state::{Epoch, FetchResolution, ListPhase, ListState, ListView};
pub use organization::{Organization, OrganizationDraft};
pub use repository::ResourceRepository;
pub use search::SearchFields;

/// Server-assigned identifier.
///
/// Backends hand out numeric or string ids; both are kept as their decimal/string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
        })
    }
}

/// The entity types the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Contact,
    Organization,
    AdminUser,
}

impl ResourceKind {
    /// Singular, human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Organization => "organization",
            Self::AdminUser => "user",
        }
    }

    /// Path segment of the list screen under the protected root.
    pub fn screen_segment(&self) -> &'static str {
        match self {
            Self::Contact => "contacts",
            Self::Organization => "organizations",
            Self::AdminUser => "users",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An entity type that can be listed, filtered and mutated.
pub trait Resource: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    /// Payload sent on create and update.
    type Draft: Serialize + fmt::Debug + Clone + Send + Sync + 'static;

    const KIND: ResourceKind;

    fn id(&self) -> &ResourceId;

    /// Fields the list filter matches against.
    fn search_fields() -> SearchFields<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_accept_strings_and_numbers() {
        let ids: Vec<ResourceId> = serde_json::from_str(r#"["a-1", 42, -3]"#).unwrap();
        assert_eq!(
            ids,
            vec![
                ResourceId::from("a-1"),
                ResourceId::from("42"),
                ResourceId::from("-3")
            ]
        );
    }

    #[test]
    fn ids_serialize_as_strings() {
        let json = serde_json::to_string(&ResourceId::from("42")).unwrap();
        assert_eq!(json, r#""42""#);
    }

    #[test]
    fn ids_reject_other_shapes() {
        assert!(serde_json::from_str::<ResourceId>("true").is_err());
        assert!(serde_json::from_str::<ResourceId>("null").is_err());
    }
}
