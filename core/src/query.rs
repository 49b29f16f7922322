//! Query string assembly for list endpoints.
//!
//! Parameters that are `None` never reach the wire. Empty strings are real
//! values and are sent as-is.

use crate::error::{Error, Result};

/// An ordered set of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Adds `{field}[gte]` and `{field}[lte]` for whichever bounds are set.
    pub fn with_range(self, field: &str, range: &DateRange) -> Self {
        self.with_opt(&format!("{field}[gte]"), range.gte.as_deref())
            .with_opt(&format!("{field}[lte]"), range.lte.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Percent-encoded `k=v&k=v` form, without the leading `?`.
    pub fn encode(&self) -> Result<String> {
        serde_urlencoded::to_string(&self.pairs).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Inclusive creation-date window, serialized as `created_at[gte]` and
/// `created_at[lte]`. Bounds are ISO-8601 timestamps passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub gte: Option<String>,
    pub lte: Option<String>,
}

impl DateRange {
    pub fn between(gte: impl Into<String>, lte: impl Into<String>) -> Self {
        Self {
            gte: Some(gte.into()),
            lte: Some(lte.into()),
        }
    }

    pub fn since(gte: impl Into<String>) -> Self {
        Self {
            gte: Some(gte.into()),
            lte: None,
        }
    }

    pub fn until(lte: impl Into<String>) -> Self {
        Self {
            gte: None,
            lte: Some(lte.into()),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.gte.is_none() && self.lte.is_none()
    }
}
