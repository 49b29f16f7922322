//! Topups: move money from a funding source into the Tremendous balance.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topup {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fully_credited_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reversed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reversed_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

/// Pagination for `GET /topups`. Default offset 0; the API fixes the page size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListTopups {
    pub offset: u32,
}

impl ListTopups {
    pub fn to_query(&self) -> Query {
        Query::new().with("offset", self.offset)
    }
}

/// Body of `POST /topups`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateTopup {
    pub amount: f64,
    pub idempotency_key: String,
    pub funding_source_id: String,
}

impl CreateTopup {
    /// Topup with a freshly generated idempotency key. Keep the key if the
    /// call may be retried by the application.
    pub fn new(amount: f64, funding_source_id: impl Into<String>) -> Self {
        Self::with_key(amount, funding_source_id, Uuid::new_v4().to_string())
    }

    pub fn with_key(
        amount: f64,
        funding_source_id: impl Into<String>,
        idempotency_key: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            idempotency_key: idempotency_key.into(),
            funding_source_id: funding_source_id.into(),
        }
    }
}

pub struct Topups<'a> {
    client: &'a TremendousClient,
}

impl<'a> Topups<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    pub fn list(&self, params: &ListTopups) -> Result<Vec<Topup>> {
        self.client
            .fetch_list("/topups", &params.to_query(), Some("topups"))
    }

    pub fn get(&self, id: &str) -> Result<Topup> {
        self.client
            .fetch_one(&format!("/topups/{id}"), &Query::new(), Some("topup"))
    }

    pub fn create(&self, topup: &CreateTopup) -> Result<Topup> {
        self.client.create("/topups", Some(topup), Some("topup"))
    }
}
