//! Contact entity.

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceId, ResourceKind, SearchFields};

/// A person in the CRM, optionally attached to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ResourceId,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    /// Id of the organization the contact belongs to.
    #[serde(default)]
    pub organization: Option<ResourceId>,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, alias = "postalCode")]
    pub postal_code: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Create/update payload for a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<ResourceId>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl From<&Contact> for ContactDraft {
    fn from(contact: &Contact) -> Self {
        Self {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            organization: contact.organization.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
            city: contact.city.clone(),
            state: contact.state.clone(),
            country: contact.country.clone(),
            postal_code: contact.postal_code.clone(),
        }
    }
}

fn first_name(c: &Contact) -> Option<&str> {
    Some(c.first_name.as_str())
}

fn last_name(c: &Contact) -> Option<&str> {
    Some(c.last_name.as_str())
}

fn city(c: &Contact) -> Option<&str> {
    Some(c.city.as_str())
}

fn phone(c: &Contact) -> Option<&str> {
    Some(c.phone.as_str())
}

impl Resource for Contact {
    type Draft = ContactDraft;

    const KIND: ResourceKind = ResourceKind::Contact;

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn search_fields() -> SearchFields<Self> {
        SearchFields::new()
            .field("first_name", first_name)
            .field("last_name", last_name)
            .field("city", city)
            .field("phone", phone)
    }
}
