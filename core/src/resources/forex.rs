use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::TremendousClient;
use crate::error::Result;
use crate::query::Query;

/// Exchange rates from a base currency, keyed by ISO currency code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForexRates {
    pub forex: BTreeMap<String, f64>,
}

impl ForexRates {
    pub fn rate(&self, currency_code: &str) -> Option<f64> {
        self.forex.get(currency_code).copied()
    }
}

pub struct Forex<'a> {
    client: &'a TremendousClient,
}

impl<'a> Forex<'a> {
    pub(crate) fn new(client: &'a TremendousClient) -> Self {
        Self { client }
    }

    /// Current rates against `base` (e.g. `USD`). The body is not enveloped.
    pub fn rates(&self, base: &str) -> Result<ForexRates> {
        self.client
            .fetch_one("/forex", &Query::new().with("base", base), None)
    }
}
