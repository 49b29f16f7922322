//! The dispatch core every resource facade routes through.
//!
//! # Design
//! `TremendousClient` holds the resolved base URL, the API key, and the
//! transport, and carries no mutable state between calls. Each call is split
//! into `build_request`, which produces an `HttpRequest` with the bearer and
//! content-type headers attached, and `parse_one` / `parse_list`, which check
//! the status, decode JSON, and pull the payload out of its envelope. The
//! verbs (`fetch_one`, `fetch_list`, `create`, `update`, `delete`) glue the
//! two halves together around exactly one `Transport::execute`.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ClientConfig, Environment};
use crate::envelope;
use crate::error::{Error, ErrorPayload, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::query::Query;
use crate::resources::{
    BalanceTransactions, Campaigns, Fields, Forex, FundingSources, Invoices, Members, Orders,
    Organizations, Products, Rewards, Roles, Topups, Webhooks,
};

/// Blocking client for the Tremendous API.
///
/// Construct once and share by reference; resource facades borrow it.
pub struct TremendousClient {
    base_url: String,
    api_key: String,
    transport: Box<dyn Transport>,
}

impl TremendousClient {
    /// Client for `environment` using the default `ureq` transport.
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Self {
        Self::from_config(ClientConfig::new(api_key, environment))
    }

    pub fn sandbox(api_key: impl Into<String>) -> Self {
        Self::new(api_key, Environment::Sandbox)
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// See `ClientConfig::from_env` for the variables read.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(ClientConfig::from_env()?))
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            base_url: config.resolved_base_url(),
            api_key: config.api_key,
            transport: Box::new(transport),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- Request building ---

    /// Builds a request for `path` (relative to the base URL, leading `/`).
    ///
    /// `body` is JSON-encoded as given; fields the params struct skips never
    /// appear on the wire.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&B>,
    ) -> Result<HttpRequest> {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode()?);
        }
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url,
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", self.api_key)),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        })
    }

    // --- Response parsing ---

    /// Decodes one record from `body[key]`, or from the whole body.
    pub fn parse_one<T: DeserializeOwned>(&self, response: HttpResponse, key: Option<&str>) -> Result<T> {
        check_status(&response)?;
        let body = envelope::decode_body(&response.body)?;
        envelope::decode_one(body, key)
    }

    /// Decodes the array at `body[key]`, or the whole body as an array.
    pub fn parse_list<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
        key: Option<&str>,
    ) -> Result<Vec<T>> {
        check_status(&response)?;
        let body = envelope::decode_body(&response.body)?;
        envelope::decode_list(body, key)
    }

    // --- Verbs ---

    pub fn fetch_one<T: DeserializeOwned>(&self, path: &str, query: &Query, key: Option<&str>) -> Result<T> {
        let response = self.send(HttpMethod::Get, path, query, None::<&()>)?;
        self.parse_one(response, key)
    }

    pub fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        key: Option<&str>,
    ) -> Result<Vec<T>> {
        let response = self.send(HttpMethod::Get, path, query, None::<&()>)?;
        self.parse_list(response, key)
    }

    /// POST. With `T = serde_json::Value` and no key, returns the raw body.
    pub fn create<T, B>(&self, path: &str, body: Option<&B>, key: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(HttpMethod::Post, path, &Query::new(), body)?;
        self.parse_one(response, key)
    }

    pub fn update<T, B>(&self, path: &str, body: Option<&B>, key: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(HttpMethod::Put, path, &Query::new(), body)?;
        self.parse_one(response, key)
    }

    pub fn delete<T, B>(&self, path: &str, body: Option<&B>, key: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(HttpMethod::Delete, path, &Query::new(), body)?;
        self.parse_one(response, key)
    }

    fn send<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&B>,
    ) -> Result<HttpResponse> {
        let request = self.build_request(method, path, query, body)?;
        debug!(%method, path, "dispatching request");
        self.transport.execute(&request)
    }

    // --- Resource facades ---

    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    pub fn rewards(&self) -> Rewards<'_> {
        Rewards::new(self)
    }

    pub fn orders(&self) -> Orders<'_> {
        Orders::new(self)
    }

    pub fn campaigns(&self) -> Campaigns<'_> {
        Campaigns::new(self)
    }

    pub fn funding_sources(&self) -> FundingSources<'_> {
        FundingSources::new(self)
    }

    pub fn invoices(&self) -> Invoices<'_> {
        Invoices::new(self)
    }

    pub fn topups(&self) -> Topups<'_> {
        Topups::new(self)
    }

    pub fn balance_transactions(&self) -> BalanceTransactions<'_> {
        BalanceTransactions::new(self)
    }

    pub fn organizations(&self) -> Organizations<'_> {
        Organizations::new(self)
    }

    pub fn members(&self) -> Members<'_> {
        Members::new(self)
    }

    pub fn roles(&self) -> Roles<'_> {
        Roles::new(self)
    }

    pub fn fields(&self) -> Fields<'_> {
        Fields::new(self)
    }

    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(self)
    }

    pub fn forex(&self) -> Forex<'_> {
        Forex::new(self)
    }
}

impl fmt::Debug for TremendousClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TremendousClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Non-2xx becomes `Error::Api` before any decode is attempted.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    let payload = ErrorPayload::from_body(&response.body);
    warn!(status = response.status, %payload, "request rejected by API");
    Err(Error::Api {
        status: response.status,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Value};

    /// Fails every call; these tests exercise only the pure halves.
    struct Offline;

    impl Transport for Offline {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse> {
            Err(Error::Transport("offline".to_string()))
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        id: String,
        status: Option<String>,
    }

    fn client() -> TremendousClient {
        let config = ClientConfig::new("TOKEN", Environment::Sandbox).with_base_url("http://localhost:3000");
        TremendousClient::with_transport(config, Offline)
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_produces_correct_request() {
        let req = client()
            .build_request(HttpMethod::Get, "/widgets", &Query::new(), None::<&()>)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/widgets");
        assert!(req.body.is_none());
        assert_eq!(req.header("authorization"), Some("Bearer TOKEN"));
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn build_appends_encoded_query() {
        let query = Query::new().with("offset", 5).with_opt("campaign_id", None::<&str>);
        let req = client()
            .build_request(HttpMethod::Get, "/widgets", &query, None::<&()>)
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/widgets?offset=5");
    }

    #[test]
    fn build_post_serializes_body() {
        let body = json!({"name": "w"});
        let req = client()
            .build_request(HttpMethod::Post, "/widgets", &Query::new(), Some(&body))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn base_url_comes_from_environment() {
        let c = TremendousClient::with_transport(ClientConfig::new("k", Environment::Production), Offline);
        assert_eq!(c.base_url(), "https://api.tremendous.com/v2");
        let c = TremendousClient::with_transport(ClientConfig::new("k", Environment::Sandbox), Offline);
        assert_eq!(c.base_url(), "https://testflight.tremendous.com/api/v2");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("k", Environment::Sandbox).with_base_url("http://localhost:3000/");
        let c = TremendousClient::with_transport(config, Offline);
        let req = c
            .build_request(HttpMethod::Get, "/widgets", &Query::new(), None::<&()>)
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/widgets");
    }

    #[test]
    fn parse_one_extracts_envelope() {
        let widget: Widget = client()
            .parse_one(response(200, r#"{"widget":{"id":"w1","status":"ok"},"meta":1}"#), Some("widget"))
            .unwrap();
        assert_eq!(widget, Widget { id: "w1".into(), status: Some("ok".into()) });
    }

    #[test]
    fn parse_list_success() {
        let widgets: Vec<Widget> = client()
            .parse_list(response(200, r#"{"widgets":[{"id":"a"},{"id":"b"}]}"#), Some("widgets"))
            .unwrap();
        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[1].id, "b");
    }

    #[test]
    fn parse_not_found_carries_payload() {
        let err = client()
            .parse_one::<Widget>(response(404, r#"{"error":"not_found"}"#), Some("widget"))
            .unwrap_err();
        match err {
            Error::Api { status, payload } => {
                assert_eq!(status, 404);
                assert_eq!(payload, ErrorPayload::Json(json!({"error": "not_found"})));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn parse_error_status_never_decodes() {
        // A body that would decode fine must still be rejected on 500.
        let err = client()
            .parse_one::<Widget>(response(500, r#"{"widget":{"id":"w1"}}"#), Some("widget"))
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, .. }));
    }

    #[test]
    fn parse_error_with_text_body() {
        let err = client()
            .parse_list::<Widget>(response(502, "bad gateway"), Some("widgets"))
            .unwrap_err();
        assert!(matches!(err, Error::Api { payload: ErrorPayload::Text(t), .. } if t == "bad gateway"));
    }

    #[test]
    fn parse_bad_json() {
        let err = client()
            .parse_one::<Widget>(response(200, "not json"), Some("widget"))
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn parse_raw_body_without_key() {
        let raw: Value = client()
            .parse_one(response(200, r#"{"success":true}"#), None)
            .unwrap();
        assert_eq!(raw, json!({"success": true}));
    }

    #[test]
    fn transport_failure_propagates() {
        let err = client()
            .fetch_list::<Widget>("/widgets", &Query::new(), Some("widgets"))
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let text = format!("{:?}", client());
        assert!(!text.contains("TOKEN"));
    }
}
