//! Invoices: prepay an organization's balance by bank transfer.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;
use crate::resources::orders::Order;
use crate::resources::rewards::Reward;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Order>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards: Option<Vec<Reward>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

/// Pagination for `GET /invoices`. Defaults: offset 0, limit 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListInvoices {
    pub offset: u32,
    pub limit: u32,
}

impl Default for ListInvoices {
    fn default() -> Self {
        Self { offset: 0, limit: 10 }
    }
}

impl ListInvoices {
    pub fn to_query(&self) -> Query {
        Query::new().with("offset", self.offset).with("limit", self.limit)
    }
}

/// Body of `POST /invoices`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateInvoice {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl CreateInvoice {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            po_number: None,
            memo: None,
        }
    }
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    id: &'a str,
}

pub struct Invoices<'a> {
    client: &'a TremendousClient,
}

impl<'a> Invoices<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    pub fn list(&self, params: &ListInvoices) -> Result<Vec<Invoice>> {
        self.client
            .fetch_list("/invoices", &params.to_query(), Some("invoices"))
    }

    pub fn get(&self, id: &str) -> Result<Invoice> {
        self.client
            .fetch_one(&format!("/invoices/{id}"), &Query::new(), Some("invoice"))
    }

    pub fn create(&self, invoice: &CreateInvoice) -> Result<Invoice> {
        self.client.create("/invoices", Some(invoice), Some("invoice"))
    }

    /// Deletes an unpaid invoice and returns it as it was.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<Invoice> {
        self.client.delete(
            &format!("/invoices/{id}"),
            Some(&DeleteBody { id }),
            Some("invoice"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_omits_missing_po_and_memo() {
        assert_eq!(
            serde_json::to_value(CreateInvoice::new(500.0)).unwrap(),
            json!({"amount": 500.0})
        );
    }

    #[test]
    fn invoice_decodes_nested_orders() {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": "I1",
            "amount": 100.0,
            "status": "PAID",
            "orders": [{"id": "O1"}, {"id": "O2"}]
        }))
        .unwrap();
        assert_eq!(invoice.orders.unwrap().len(), 2);
    }
}
