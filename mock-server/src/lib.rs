//! In-memory stand-in for the Tremendous REST API.
//!
//! Serves the same envelopes (`{"order": {..}}`, `{"orders": [..]}`), the
//! same bearer-token requirement, and the same `{"errors": {..}}` error
//! bodies as the real service, so the client can be exercised end to end
//! without network access. Everything lives in one `Store` behind a lock;
//! lists are kept newest first.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

mod routes;

/// Path prefix the API is mounted under, mirroring the sandbox root.
pub const API_PREFIX: &str = "/api/v2";

pub type Db = Arc<RwLock<Store>>;

/// All mock state.
#[derive(Debug, Default)]
pub struct Store {
    /// When set, new orders wait in `PENDING APPROVAL` until approved.
    pub approvals_required: bool,
    pub balance: f64,
    seq: u64,
    pub products: Vec<Value>,
    pub funding_sources: Vec<Value>,
    pub roles: Vec<Value>,
    pub fields: Vec<Value>,
    pub orders: Vec<Value>,
    pub campaigns: Vec<Value>,
    pub invoices: Vec<Value>,
    pub topups: Vec<Value>,
    pub transactions: Vec<Value>,
    pub organizations: Vec<Value>,
    pub members: Vec<Value>,
    pub webhooks: Vec<Value>,
}

impl Store {
    /// A store with a small catalog, two funding sources, roles and fields.
    pub fn seeded() -> Self {
        Self {
            balance: 1000.0,
            products: vec![
                json!({
                    "id": "OKMHM2X2OHYV",
                    "name": "Amazon.com",
                    "description": "Amazon.com gift cards",
                    "category": "merchant_card",
                    "subcategory": "shopping",
                    "disclosure": "Restrictions apply",
                    "skus": [{"min": 5.0, "max": 2000.0}],
                    "currency_codes": ["USD"],
                    "countries": [{"abbr": "US"}],
                    "images": [{"src": "https://testflight.tremendous.com/images/amazon.png", "type": "card", "content_type": "image/png"}],
                    "usage_instructions": "Redeem at amazon.com/redeem"
                }),
                json!({
                    "id": "ET0ZVETV5ILN",
                    "name": "Visa Prepaid Card",
                    "description": "Virtual Visa card usable anywhere Visa is accepted",
                    "category": "visa_card",
                    "skus": [{"min": 1.0, "max": 5000.0}],
                    "currency_codes": ["USD", "CAD"],
                    "countries": [{"abbr": "US"}, {"abbr": "CA"}],
                    "images": [],
                    "documents": {"cardholder_agreement_pdf": "https://testflight.tremendous.com/docs/visa.pdf"}
                }),
                json!({
                    "id": "KV934TZ93NQM",
                    "name": "Charity donation",
                    "description": "Donate to a charity of the recipient's choice",
                    "category": "charity",
                    "subcategory": "charity",
                    "skus": [{"min": 1.0, "max": 10000.0}],
                    "currency_codes": ["USD", "EUR"],
                    "countries": [{"abbr": "US"}, {"abbr": "DE"}],
                    "images": []
                }),
            ],
            funding_sources: vec![
                json!({
                    "id": "BALANCE",
                    "method": "balance",
                    "usage_permissions": ["orders", "topups"],
                    "status": "active",
                    "type": "COMMERCIAL",
                    "meta": {"available_cents": 100000, "pending_cents": 0}
                }),
                json!({
                    "id": "CREDITCARD01",
                    "method": "credit_card",
                    "usage_permissions": ["orders"],
                    "status": "active",
                    "meta": {"network": "VISA", "last4": "4242"}
                }),
            ],
            roles: vec![
                json!({"id": "ADMIN", "title": "Admin", "description": "Full access"}),
                json!({"id": "MEMBER", "title": "Member", "description": "Can send rewards"}),
            ],
            fields: vec![json!({
                "id": "FLD1",
                "label": "Department",
                "data_type": "Dropdown",
                "data": {"options": ["Sales", "Support"]},
                "required": false,
                "scope": "REWARD"
            })],
            ..Default::default()
        }
    }

    pub fn with_approvals(mut self) -> Self {
        self.approvals_required = true;
        self
    }

    pub(crate) fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()[..12].to_uppercase()
    }

    /// Strictly increasing timestamps so creation-date ordering is stable.
    pub(crate) fn now(&mut self) -> String {
        self.seq += 1;
        let s = self.seq;
        format!(
            "2024-01-01T{:02}:{:02}:{:02}Z",
            (s / 3600) % 24,
            (s / 60) % 60,
            s % 60
        )
    }
}

/// Error body in the shape the real API uses.
#[derive(Debug)]
pub struct Rejection {
    pub status: StatusCode,
    pub message: String,
}

impl Rejection {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Resource not found")
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let body = json!({"errors": {"message": self.message, "payload": {}}});
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .nest(API_PREFIX, routes::api())
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Store::seeded()).await
}

pub async fn run_with(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(store)).await
}

async fn require_bearer(req: Request, next: Next) -> Response {
    debug!(method = %req.method(), path = %req.uri().path(), "mock request");
    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        return Rejection::new(StatusCode::UNAUTHORIZED, "Authentication failed").into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_has_catalog() {
        let store = Store::seeded();
        assert_eq!(store.products.len(), 3);
        assert!(store.funding_sources.iter().any(|f| f["id"] == "BALANCE"));
        assert!(store.orders.is_empty());
    }

    #[test]
    fn ids_are_short_uppercase() {
        let mut store = Store::default();
        let id = store.next_id();
        assert_eq!(id.len(), 12);
        assert_eq!(id, id.to_uppercase());
        assert_ne!(id, store.next_id());
    }

    #[test]
    fn timestamps_increase() {
        let mut store = Store::default();
        let a = store.now();
        let b = store.now();
        assert!(a < b);
        assert_eq!(a, "2024-01-01T00:00:01Z");
    }

    #[test]
    fn rejection_keeps_status() {
        let response = Rejection::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
