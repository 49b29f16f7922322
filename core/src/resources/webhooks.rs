//! Webhooks: endpoints Tremendous calls when reward and order events occur.
//!
//! Verifying webhook signatures is left to the receiving application.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Webhook {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Signing key; only returned on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// Event names a webhook can be triggered with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookEvents {
    pub events: Vec<String>,
}

/// Body of `POST /webhooks`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateWebhook {
    pub url: String,
}

#[derive(Serialize)]
struct SimulateBody<'a> {
    event: &'a str,
}

pub struct Webhooks<'a> {
    client: &'a TremendousClient,
}

impl<'a> Webhooks<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Webhook>> {
        self.client
            .fetch_list("/webhooks", &Query::new(), Some("webhooks"))
    }

    pub fn get(&self, id: &str) -> Result<Webhook> {
        self.client
            .fetch_one(&format!("/webhooks/{id}"), &Query::new(), Some("webhook"))
    }

    pub fn create(&self, url: &str) -> Result<Webhook> {
        let body = CreateWebhook { url: url.to_string() };
        self.client.create("/webhooks", Some(&body), Some("webhook"))
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<Webhook> {
        self.client
            .delete(&format!("/webhooks/{id}"), None::<&Value>, Some("webhook"))
    }

    /// Makes Tremendous fire `event` at the webhook's URL. Returns the raw
    /// acknowledgement body (`null` when the API answers with no content).
    #[instrument(skip(self))]
    pub fn simulate(&self, id: &str, event: &str) -> Result<Value> {
        self.client.create(
            &format!("/webhooks/{id}/simulate"),
            Some(&SimulateBody { event }),
            None,
        )
    }

    /// Events accepted by `simulate`. The body is not enveloped.
    pub fn list_events(&self, id: &str) -> Result<WebhookEvents> {
        self.client
            .fetch_one(&format!("/webhooks/{id}/events"), &Query::new(), None)
    }
}
