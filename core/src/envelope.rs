//! Envelope extraction and typed decoding of response bodies.
//!
//! Tremendous nests every payload under a per-endpoint key: `{"order": {..}}`
//! for one entity, `{"orders": [..]}` for a list. The key is supplied by the
//! caller; when it is `None` the whole body is the payload.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Parses a 2xx body. An empty body is JSON `null`.
pub fn decode_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| Error::Decode(format!("body is not valid JSON: {e}")))
}

/// Returns `body[key]`, or the whole body when `key` is `None`.
pub fn extract(body: Value, key: Option<&str>) -> Result<Value> {
    let Some(key) = key else {
        return Ok(body);
    };
    match body {
        Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| Error::Decode(format!("missing envelope key {key:?}"))),
        other => Err(Error::Decode(format!(
            "expected an object holding {key:?}, got {}",
            kind(&other)
        ))),
    }
}

pub fn decode_one<T: DeserializeOwned>(body: Value, key: Option<&str>) -> Result<T> {
    let payload = extract(body, key)?;
    serde_json::from_value(payload).map_err(|e| Error::Decode(format!("{}: {e}", label(key))))
}

/// Decodes each element in the order the server sent them.
pub fn decode_list<T: DeserializeOwned>(body: Value, key: Option<&str>) -> Result<Vec<T>> {
    let payload = extract(body, key)?;
    let Value::Array(items) = payload else {
        return Err(Error::Decode(format!(
            "{}: expected an array, got {}",
            label(key),
            kind(&payload)
        )));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| Error::Decode(format!("{}[{i}]: {e}", label(key))))
        })
        .collect()
}

fn label(key: Option<&str>) -> &str {
    key.unwrap_or("body")
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
