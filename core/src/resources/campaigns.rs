//! Campaigns: reusable templates for the product catalog and the look of
//! the reward email and landing page.

use serde::{Deserialize, Serialize};

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webpage_style: Option<WebpageStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_style: Option<EmailStyle>,
}

/// Styling of the redemption landing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebpageStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_image_height_px: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// Styling of the delivery email.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_image_height_px: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
}

/// Body of `POST /campaigns`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateCampaign {
    pub name: String,
    pub description: String,
    pub products: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webpage_style: Option<WebpageStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_style: Option<EmailStyle>,
}

impl CreateCampaign {
    pub fn new(name: impl Into<String>, description: impl Into<String>, products: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            products,
            webpage_style: None,
            email_style: None,
        }
    }
}

/// Body of `PUT /campaigns/{id}`. Only set fields are changed.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdateCampaign {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webpage_style: Option<WebpageStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_style: Option<EmailStyle>,
}

pub struct Campaigns<'a> {
    client: &'a TremendousClient,
}

impl<'a> Campaigns<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Campaign>> {
        self.client
            .fetch_list("/campaigns", &Query::new(), Some("campaigns"))
    }

    pub fn get(&self, id: &str) -> Result<Campaign> {
        self.client
            .fetch_one(&format!("/campaigns/{id}"), &Query::new(), Some("campaign"))
    }

    pub fn create(&self, campaign: &CreateCampaign) -> Result<Campaign> {
        self.client.create("/campaigns", Some(campaign), Some("campaign"))
    }

    pub fn update(&self, id: &str, changes: &UpdateCampaign) -> Result<Campaign> {
        self.client
            .update(&format!("/campaigns/{id}"), Some(changes), Some("campaign"))
    }
}
