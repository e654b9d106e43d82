/*
[INPUT]:  Raw inbound WebSocket frame text
[OUTPUT]: The top-level `data` field of the JSON payload
[POS]:    WebSocket layer - message decoding
[UPDATE]: When changing the inbound envelope format
*/

use serde_json::Value;

use crate::error::{Result, SocketError};

/// Parse `text` as JSON and take its top-level `data` field.
///
/// An explicit `"data": null` is returned as `Value::Null`; a missing field
/// (or a non-object payload) is `SocketError::MissingData`.
pub fn extract_data(text: &str) -> Result<Value> {
    let parsed: Value = serde_json::from_str(text).map_err(SocketError::decode)?;
    match parsed {
        Value::Object(mut fields) => fields.remove("data").ok_or(SocketError::MissingData),
        _ => Err(SocketError::MissingData),
    }
}
