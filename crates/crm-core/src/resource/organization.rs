//! Organization entity.

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceId, ResourceKind, SearchFields};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default, alias = "region")]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, alias = "postalCode")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

fn name(o: &Organization) -> Option<&str> {
    Some(o.name.as_str())
}

fn city(o: &Organization) -> Option<&str> {
    Some(o.city.as_str())
}

impl Resource for Organization {
    type Draft = OrganizationDraft;

    const KIND: ResourceKind = ResourceKind::Organization;

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn search_fields() -> SearchFields<Self> {
        SearchFields::new().field("name", name).field("city", city)
    }
}
