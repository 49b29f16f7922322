//! Organizations: sub-accounts under the caller's organization.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of `POST /organizations`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateOrganization {
    pub name: String,
    pub website: String,
    /// Ask the API to mint a key for the new organization. Defaults to false.
    pub with_api_key: bool,
    /// Which settings to copy from the parent organization. Passed through
    /// as given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_settings: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CreateOrganization {
    pub fn new(name: impl Into<String>, website: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            website: website.into(),
            with_api_key: false,
            copy_settings: None,
            phone: None,
        }
    }
}

pub struct Organizations<'a> {
    client: &'a TremendousClient,
}

impl<'a> Organizations<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Organization>> {
        self.client
            .fetch_list("/organizations", &Query::new(), Some("organizations"))
    }

    pub fn get(&self, id: &str) -> Result<Organization> {
        self.client.fetch_one(
            &format!("/organizations/{id}"),
            &Query::new(),
            Some("organization"),
        )
    }

    pub fn create(&self, organization: &CreateOrganization) -> Result<Organization> {
        self.client
            .create("/organizations", Some(organization), Some("organization"))
    }

    /// Mints a new API key for the calling organization. Returns the raw body.
    #[instrument(skip(self))]
    pub fn create_api_key(&self) -> Result<Value> {
        self.client
            .create("/organizations/create_api_key", None::<&Value>, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_always_sends_with_api_key() {
        assert_eq!(
            serde_json::to_value(CreateOrganization::new("Acme", "https://acme.test")).unwrap(),
            json!({"name": "Acme", "website": "https://acme.test", "with_api_key": false})
        );
    }
}
