//! Members: users of an organization.

use serde::{Deserialize, Serialize};

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

/// Body of `POST /members`. `role` is a role id from `GET /roles`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateMember {
    pub email: String,
    pub role: String,
}

impl CreateMember {
    pub fn new(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: role.into(),
        }
    }
}

pub struct Members<'a> {
    client: &'a TremendousClient,
}

impl<'a> Members<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Member>> {
        self.client
            .fetch_list("/members", &Query::new(), Some("members"))
    }

    pub fn get(&self, id: &str) -> Result<Member> {
        self.client
            .fetch_one(&format!("/members/{id}"), &Query::new(), Some("member"))
    }

    pub fn create(&self, member: &CreateMember) -> Result<Member> {
        self.client.create("/members", Some(member), Some("member"))
    }
}
