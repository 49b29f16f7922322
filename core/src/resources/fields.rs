//! Custom fields for reporting. They are defined in the dashboard; the API
//! only lists them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Type-specific settings, e.g. the options of a dropdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

pub struct Fields<'a> {
    client: &'a TremendousClient,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Field>> {
        self.client.fetch_list("/fields", &Query::new(), Some("fields"))
    }
}
