/*
[INPUT]:  Caller closures and an optional serializable request
[OUTPUT]: ConnectionConfig consumed by create_connection
[POS]:    WebSocket layer - connection configuration and hooks
[UPDATE]: When adding lifecycle hooks or changing request handling
*/

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SocketError};

pub type MessageHook = Box<dyn FnMut(Value) + Send + 'static>;
pub type OpenHook = Box<dyn FnOnce() + Send + 'static>;
pub type ErrorHook = Box<dyn FnMut(SocketError) + Send + 'static>;
pub type CloseHook = Box<dyn FnOnce() + Send + 'static>;

/// What to send on open and which hooks receive connection events.
///
/// All hooks run on the connection task, one at a time, in event order.
pub struct ConnectionConfig {
    request: Option<Value>,
    pub(crate) hooks: Hooks,
}

impl ConnectionConfig {
    /// Create a config whose `on_message` hook receives each inbound `data` field
    pub fn new<F>(on_message: F) -> Self
    where
        F: FnMut(Value) + Send + 'static,
    {
        Self {
            request: None,
            hooks: Hooks {
                on_message: Box::new(on_message),
                on_open: None,
                on_error: None,
                on_close: None,
            },
        }
    }

    /// Serialize `request` now and send it once when the connection opens.
    ///
    /// Empty requests are skipped, see `with_request_value`.
    ///
    /// # Errors
    /// Returns `SocketError::Serialization` if `request` cannot be
    /// represented as JSON.
    pub fn with_request<T>(self, request: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(request)?;
        Ok(self.with_request_value(value))
    }

    /// Send `request` once when the connection opens.
    ///
    /// `null`, `false`, `0` and `""` count as no request and send nothing.
    /// Empty arrays and objects are still sent.
    pub fn with_request_value(mut self, request: Value) -> Self {
        self.request = is_present(&request).then_some(request);
        self
    }

    pub fn on_open<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.hooks.on_open = Some(Box::new(hook));
        self
    }

    /// Receive handshake, transport and per-frame decode failures
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: FnMut(SocketError) + Send + 'static,
    {
        self.hooks.on_error = Some(Box::new(hook));
        self
    }

    pub fn on_close<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.hooks.on_close = Some(Box::new(hook));
        self
    }

    pub fn request(&self) -> Option<&Value> {
        self.request.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Option<Value>, Hooks) {
        (self.request, self.hooks)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("request", &self.request)
            .field("hooks", &self.hooks)
            .finish()
    }
}

fn is_present(request: &Value) -> bool {
    match request {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) struct Hooks {
    on_message: MessageHook,
    on_open: Option<OpenHook>,
    on_error: Option<ErrorHook>,
    on_close: Option<CloseHook>,
}

impl Hooks {
    pub(crate) fn message(&mut self, data: Value) {
        (self.on_message)(data);
    }

    pub(crate) fn open(&mut self) {
        if let Some(hook) = self.on_open.take() {
            hook();
        }
    }

    pub(crate) fn error(&mut self, err: SocketError) {
        if let Some(hook) = self.on_error.as_mut() {
            hook(err);
        }
    }

    pub(crate) fn close(&mut self) {
        if let Some(hook) = self.on_close.take() {
            hook();
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_open", &self.on_open.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_request_is_serialized_eagerly() {
        #[derive(Serialize)]
        struct Subscribe<'a> {
            channel: &'a str,
        }

        let config = ConnectionConfig::new(|_| {})
            .with_request(&Subscribe { channel: "price" })
            .unwrap();
        assert_eq!(config.request(), Some(&json!({"channel": "price"})));
    }

    #[test]
    fn test_empty_requests_are_dropped() {
        for empty in [Value::Null, json!(false), json!(0), json!(0.0), json!("")] {
            let config = ConnectionConfig::new(|_| {}).with_request_value(empty.clone());
            assert!(config.request().is_none(), "{empty} should send nothing");
        }

        let config = ConnectionConfig::new(|_| {}).with_request(&0u8).unwrap();
        assert!(config.request().is_none());
    }

    #[test]
    fn test_non_empty_requests_are_kept() {
        for present in [json!(true), json!(-1), json!("ping"), json!([]), json!({})] {
            let config = ConnectionConfig::new(|_| {}).with_request_value(present.clone());
            assert_eq!(config.request(), Some(&present));
        }
    }

    #[test]
    fn test_unserializable_request() {
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "tuple keys are not JSON");
        let err = ConnectionConfig::new(|_| {}).with_request(&map).unwrap_err();
        assert!(matches!(err, SocketError::Serialization(_)));
    }

    #[test]
    fn test_once_hooks_fire_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let opened = calls.clone();
        let closed = calls.clone();
        let config = ConnectionConfig::new(|_| {})
            .on_open(move || opened.lock().unwrap().push("open"))
            .on_close(move || closed.lock().unwrap().push("close"));
        let (_, mut hooks) = config.into_parts();

        hooks.open();
        hooks.open();
        hooks.close();
        hooks.close();
        hooks.error(SocketError::MissingData);

        assert_eq!(*calls.lock().unwrap(), vec!["open", "close"]);
    }

    #[test]
    fn test_debug_hides_closures() {
        let config = ConnectionConfig::new(|_| {}).on_error(|_| {});
        let debug = format!("{config:?}");
        assert!(debug.contains("on_error: true"));
        assert!(debug.contains("on_open: false"));
    }
}
