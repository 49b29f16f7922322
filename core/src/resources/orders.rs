//! Orders: the unit of payment. Each order funds one reward.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::{DateRange, Query};
use crate::resources::rewards::{Recipient, Reward, RewardValue};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards: Option<Vec<Reward>>,
}

/// Cost breakdown of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund: Option<Refund>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Refund {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

/// Filters for `GET /orders`. Defaults: offset 0, limit 10, no filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOrders {
    pub offset: u32,
    pub limit: u32,
    pub campaign_id: Option<String>,
    pub external_id: Option<String>,
    pub created_at: DateRange,
}

impl Default for ListOrders {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
            campaign_id: None,
            external_id: None,
            created_at: DateRange::default(),
        }
    }
}

impl ListOrders {
    pub fn to_query(&self) -> Query {
        Query::new()
            .with("offset", self.offset)
            .with_opt("campaign_id", self.campaign_id.as_deref())
            .with_opt("external_id", self.external_id.as_deref())
            .with_range("created_at", &self.created_at)
            .with("limit", self.limit)
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub payment: PaymentSource,
    pub reward: OrderReward,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaymentSource {
    pub funding_source_id: String,
}

/// The reward half of an order request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderReward {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,
    pub recipient: Recipient,
    pub value: RewardValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliver_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<BTreeMap<String, String>>,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<OrderDelivery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct OrderDelivery {
    pub method: DeliveryMethod,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    Email,
    Link,
    Phone,
}

impl CreateOrder {
    /// Minimal order: who pays, who receives, how much. Language is `en`.
    pub fn new(funding_source_id: impl Into<String>, recipient: Recipient, value: RewardValue) -> Self {
        Self {
            external_id: None,
            payment: PaymentSource {
                funding_source_id: funding_source_id.into(),
            },
            reward: OrderReward {
                campaign_id: None,
                products: None,
                recipient,
                value,
                deliver_at: None,
                custom_fields: None,
                language: "en".to_string(),
                delivery: None,
                meta_data: None,
            },
        }
    }

    /// Idempotency handle: the API rejects a second order with the same id.
    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn campaign(mut self, campaign_id: impl Into<String>) -> Self {
        self.reward.campaign_id = Some(campaign_id.into());
        self
    }

    pub fn products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reward.products = Some(products.into_iter().map(Into::into).collect());
        self
    }

    /// Schedule delivery for a date (`YYYY-MM-DD`).
    pub fn deliver_at(mut self, date: impl Into<String>) -> Self {
        self.reward.deliver_at = Some(date.into());
        self
    }

    pub fn custom_field(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.reward
            .custom_fields
            .get_or_insert_with(BTreeMap::new)
            .insert(id.into(), value.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.reward.language = language.into();
        self
    }

    pub fn delivery_method(mut self, method: DeliveryMethod) -> Self {
        self.reward.delivery = Some(OrderDelivery { method });
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.reward
            .meta_data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

#[derive(Serialize)]
struct ApprovalBody<'a> {
    id: &'a str,
}

pub struct Orders<'a> {
    client: &'a TremendousClient,
}

impl<'a> Orders<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    /// Orders ordered by creation date, newest first.
    pub fn list(&self, params: &ListOrders) -> Result<Vec<Order>> {
        self.client
            .fetch_list("/orders", &params.to_query(), Some("orders"))
    }

    pub fn get(&self, id: &str) -> Result<Order> {
        self.client
            .fetch_one(&format!("/orders/{id}"), &Query::new(), Some("order"))
    }

    pub fn create(&self, order: &CreateOrder) -> Result<Order> {
        self.client.create("/orders", Some(order), Some("order"))
    }

    /// Approves an order held for review. Requires "Allow approvals via API"
    /// on the organization.
    #[instrument(skip(self))]
    pub fn approve(&self, id: &str) -> Result<Order> {
        self.client.create(
            &format!("/order_approvals/{id}/approve"),
            Some(&ApprovalBody { id }),
            Some("order"),
        )
    }

    #[instrument(skip(self))]
    pub fn reject(&self, id: &str) -> Result<Order> {
        self.client.create(
            &format!("/order_approvals/{id}/reject"),
            Some(&ApprovalBody { id }),
            Some("order"),
        )
    }
}
