//! Products: the payout mechanisms (gift cards, prepaid cards, bank
//! transfers, ...) a reward can be redeemed for.

use serde::{Deserialize, Serialize};

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;

/// A catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclosure: Option<String>,
    pub skus: Vec<Sku>,
    pub currency_codes: Vec<String>,
    pub countries: Vec<Country>,
    pub images: Vec<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Documents>,
}

/// Denomination bounds for one variant of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sku {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub abbr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Documents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder_agreement_pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder_agreement_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_policy_url: Option<String>,
}

/// Filters for `GET /products`. Defaults: country `US`, currency `USD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListProducts {
    pub country: String,
    pub currency: String,
    pub subcategory: Option<String>,
}

impl Default for ListProducts {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            currency: "USD".to_string(),
            subcategory: None,
        }
    }
}

impl ListProducts {
    pub fn to_query(&self) -> Query {
        Query::new()
            .with("country", &self.country)
            .with("currency", &self.currency)
            .with_opt("subcategory", self.subcategory.as_deref())
    }
}

pub struct Products<'a> {
    client: &'a TremendousClient,
}

impl<'a> Products<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    /// Products available for the given country and currency.
    pub fn list(&self, params: &ListProducts) -> Result<Vec<Product>> {
        self.client
            .fetch_list("/products", &params.to_query(), Some("products"))
    }

    pub fn get(&self, id: &str) -> Result<Product> {
        self.client
            .fetch_one(&format!("/products/{id}"), &Query::new(), Some("product"))
    }
}
