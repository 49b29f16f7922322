//! Rewards: the monetary incentive sent to one recipient.
//!
//! The lightweight actions (`generate_link`, `resend`, `cancel`) return the
//! raw response body; the API acknowledges them with shapes that are not
//! worth a record type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;
use crate::resources::products::Product;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reward {
    pub id: String,
    pub order_id: String,
    pub created_at: String,
    pub value: RewardValue,
    pub delivery: Delivery,
    pub recipient: Recipient,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// An amount in a given currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardValue {
    pub denomination: f64,
    pub currency_code: String,
}

impl RewardValue {
    pub fn new(denomination: f64, currency_code: impl Into<String>) -> Self {
        Self {
            denomination,
            currency_code: currency_code.into(),
        }
    }

    pub fn usd(denomination: f64) -> Self {
        Self::new(denomination, "USD")
    }
}

/// Who receives a reward. Also used as input when creating an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Recipient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// How a reward was delivered and where delivery stands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Delivery {
    pub method: String,
    pub status: String,
}

/// Pagination for `GET /rewards`. Defaults: offset 0, limit 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRewards {
    pub offset: u32,
    pub limit: u32,
}

impl Default for ListRewards {
    fn default() -> Self {
        Self { offset: 0, limit: 100 }
    }
}

impl ListRewards {
    pub fn to_query(&self) -> Query {
        Query::new().with("offset", self.offset).with("limit", self.limit)
    }
}

pub struct Rewards<'a> {
    client: &'a TremendousClient,
}

impl<'a> Rewards<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    /// Rewards ordered by creation date, newest first.
    pub fn list(&self, params: &ListRewards) -> Result<Vec<Reward>> {
        self.client
            .fetch_list("/rewards", &params.to_query(), Some("rewards"))
    }

    pub fn get(&self, id: &str) -> Result<Reward> {
        self.client
            .fetch_one(&format!("/rewards/{id}"), &Query::new(), Some("reward"))
    }

    /// Creates a redemption link for a reward delivered by link.
    #[instrument(skip(self))]
    pub fn generate_link(&self, id: &str) -> Result<Value> {
        self.action(id, "generate_link")
    }

    /// Re-sends the delivery email or SMS.
    #[instrument(skip(self))]
    pub fn resend(&self, id: &str) -> Result<Value> {
        self.action(id, "resend")
    }

    /// Cancels a reward that has not been redeemed yet.
    #[instrument(skip(self))]
    pub fn cancel(&self, id: &str) -> Result<Value> {
        self.action(id, "cancel")
    }

    fn action(&self, id: &str, name: &str) -> Result<Value> {
        self.client
            .create(&format!("/rewards/{id}/{name}"), None::<&Value>, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reward_json() -> Value {
        json!({
            "id": "R1",
            "order_id": "O1",
            "created_at": "2024-03-01T10:00:00Z",
            "value": {"denomination": 25.0, "currency_code": "USD"},
            "delivery": {"method": "EMAIL", "status": "SUCCEEDED"},
            "recipient": {"name": "Ada", "email": "ada@example.com"}
        })
    }

    #[test]
    fn reward_defaults_optional_collections() {
        let reward: Reward = serde_json::from_value(reward_json()).unwrap();
        assert!(reward.products.is_empty());
        assert!(reward.campaign_id.is_none());
        assert!(reward.recipient.phone.is_none());
    }

    #[test]
    fn reward_without_delivery_fails() {
        let mut raw = reward_json();
        raw.as_object_mut().unwrap().remove("delivery");
        assert!(serde_json::from_value::<Reward>(raw).is_err());
    }

    #[test]
    fn list_defaults() {
        assert_eq!(ListRewards::default().to_query().encode().unwrap(), "offset=0&limit=100");
    }

    #[test]
    fn recipient_omits_missing_phone() {
        let recipient = Recipient::new("A", "a@x.com");
        assert_eq!(
            serde_json::to_value(&recipient).unwrap(),
            json!({"name": "A", "email": "a@x.com"})
        );
    }
}
