//! Balance transactions: the ledger of the organization's balance.

use serde::{Deserialize, Serialize};

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::{DateRange, Query};
use crate::resources::orders::Order;

/// One ledger entry. The API guarantees none of its fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BalanceTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// Filters for `GET /balance_transactions`. Defaults: offset 0, limit 10.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBalanceTransactions {
    pub offset: u32,
    pub limit: u32,
    pub created_at: DateRange,
}

impl Default for ListBalanceTransactions {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
            created_at: DateRange::default(),
        }
    }
}

impl ListBalanceTransactions {
    pub fn to_query(&self) -> Query {
        Query::new()
            .with("offset", self.offset)
            .with("limit", self.limit)
            .with_range("created_at", &self.created_at)
    }
}

pub struct BalanceTransactions<'a> {
    client: &'a TremendousClient,
}

impl<'a> BalanceTransactions<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    /// Note the envelope key is `transactions`, not `balance_transactions`.
    pub fn list(&self, params: &ListBalanceTransactions) -> Result<Vec<BalanceTransaction>> {
        self.client
            .fetch_list("/balance_transactions", &params.to_query(), Some("transactions"))
    }
}
