//! Blocking, typed client for the Tremendous rewards and payouts API.
//!
//! # Overview
//! `TremendousClient` owns the base URL (production or sandbox), the API key,
//! and a `Transport`. Resource facades (`client.orders()`,
//! `client.rewards()`, ...) borrow it and map each method onto one REST call,
//! decoding the JSON envelope into a typed record.
//!
//! ```no_run
//! use tremendous::{CreateOrder, Recipient, RewardValue, TremendousClient};
//!
//! # fn main() -> tremendous::Result<()> {
//! let client = TremendousClient::sandbox("TEST_API_KEY");
//! let order = client.orders().create(&CreateOrder::new(
//!     "BALANCE",
//!     Recipient::new("Ada", "ada@example.com"),
//!     RewardValue::usd(25.0),
//! ))?;
//! println!("order {} is {:?}", order.id, order.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - Each call is one round trip: no retries, caching, or pagination loops.
//! - Request building and response parsing are pure and public
//!   (`build_request`, `parse_one`, `parse_list`), so a host can run its own
//!   I/O and reuse the status and envelope handling.
//! - Non-2xx responses surface as `Error::Api` with the server's payload;
//!   unexpected bodies surface as `Error::Decode`.
//! - Optional parameters that are unset never reach the wire, neither as
//!   query parameters nor as JSON `null`.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod query;
pub mod resources;

pub use client::TremendousClient;
pub use config::{ClientConfig, Environment};
pub use error::{Error, ErrorPayload, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use query::{DateRange, Query};
pub use resources::*;
