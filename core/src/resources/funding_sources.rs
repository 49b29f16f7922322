//! Funding sources: the ways an organization pays for orders.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FundingSource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub usage_permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Method-specific details (balances, card last digits, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

pub struct FundingSources<'a> {
    client: &'a TremendousClient,
}

impl<'a> FundingSources<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<FundingSource>> {
        self.client
            .fetch_list("/funding_sources", &Query::new(), Some("funding_sources"))
    }

    pub fn get(&self, id: &str) -> Result<FundingSource> {
        self.client.fetch_one(
            &format!("/funding_sources/{id}"),
            &Query::new(),
            Some("funding_source"),
        )
    }
}
