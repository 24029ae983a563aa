//! Route configuration.
//!
//! A [`RouteConfig`] names the enabled processors, in trial order, together
//! with the configuration slice each one receives. Diagnostics and error
//! recovery are separate fields rather than reserved processor names.
//!
//! ```rust,ignore
//! let config = RouteConfig::new()
//!     .processor("httpProxy", json!({ "routes": [...] }))
//!     .processor("queue", json!({ "routes": [...] }))
//!     .debug(true)
//!     .on_error(|err, _event, _ctx| async move {
//!         Some(json!({ "statusCode": 500, "body": err.to_string() }))
//!     });
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{ProcessorError, SetupError, SetupResult};
use crate::event::{Event, InvocationContext};

/// Key of the diagnostics flag in a flat JSON route config.
pub const DEBUG_KEY: &str = "debug";

/// Key of the error handler in a flat JSON route config.
pub const ON_ERROR_KEY: &str = "onError";

/// Returns `true` for keys that configure the router rather than name a processor.
pub fn is_reserved_key(key: &str) -> bool {
    key == DEBUG_KEY || key == ON_ERROR_KEY
}

/// Last-resort recovery hook, consulted only when a processor fails.
///
/// Returning `Some` non-null value turns the failure into a successful
/// invocation with that value.
pub type ErrorHandler = Arc<
    dyn Fn(ProcessorError, Event, InvocationContext) -> BoxFuture<'static, Option<Value>>
        + Send
        + Sync,
>;

/// Erases an async closure into an [`ErrorHandler`].
pub fn error_handler<F, Fut>(handler: F) -> ErrorHandler
where
    F: Fn(ProcessorError, Event, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Value>> + Send + 'static,
{
    Arc::new(
        move |err: ProcessorError, event: Event, ctx: InvocationContext| {
            handler(err, event, ctx).boxed()
        },
    )
}

/// Declarative router configuration.
#[derive(Clone, Default)]
pub struct RouteConfig {
    debug: bool,
    on_error: Option<ErrorHandler>,
    processors: IndexMap<String, Value>,
}

impl RouteConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from a flat JSON object.
    ///
    /// Every key except `debug` and `onError` names a processor. A boolean
    /// `debug` sets the diagnostics flag; an `onError` entry is ignored since
    /// handlers cannot be expressed in JSON (use [`RouteConfig::on_error`]).
    pub fn from_json(value: Value) -> SetupResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(SetupError::InvalidConfig(format!(
                    "expected a JSON object, got {other}"
                )));
            }
        };

        let mut config = Self::new();
        for (key, slice) in map {
            match key.as_str() {
                DEBUG_KEY => config.debug = slice.as_bool().unwrap_or(false),
                ON_ERROR_KEY => {}
                _ => {
                    config.processors.insert(key, slice);
                }
            }
        }
        Ok(config)
    }

    /// Enables a processor with its configuration slice (builder pattern).
    ///
    /// Re-adding an existing key replaces its slice but keeps its position.
    pub fn processor(mut self, key: impl Into<String>, config: Value) -> Self {
        self.insert_processor(key, config);
        self
    }

    /// Enables a processor in place. Reserved keys are ignored.
    pub fn insert_processor(&mut self, key: impl Into<String>, config: Value) {
        let key = key.into();
        if is_reserved_key(&key) {
            return;
        }
        self.processors.insert(key, config);
    }

    /// Sets the diagnostics flag (builder pattern).
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Sets the error handler (builder pattern).
    pub fn on_error<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(ProcessorError, Event, InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Value>> + Send + 'static,
    {
        self.on_error = Some(error_handler(handler));
        self
    }

    /// Sets an already erased error handler.
    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    /// Returns whether diagnostics are enabled.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Returns the error handler, if one is set.
    pub fn error_handler(&self) -> Option<&ErrorHandler> {
        self.on_error.as_ref()
    }

    /// Iterates processor keys and slices in trial order.
    pub fn processors(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.processors.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the slice configured for `key`.
    pub fn slice(&self, key: &str) -> Option<&Value> {
        self.processors.get(key)
    }

    /// Returns the number of enabled processors.
    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }
}

impl std::fmt::Debug for RouteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteConfig")
            .field("debug", &self.debug)
            .field("has_error_handler", &self.on_error.is_some())
            .field("processors", &self.processors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_strips_reserved_keys() {
        let config = RouteConfig::from_json(json!({
            "queue": {"routes": []},
            "debug": true,
            "onError": "ignored",
            "httpProxy": {"routes": []}
        }))
        .unwrap();

        assert!(config.is_debug());
        let keys: Vec<&str> = config.processors().map(|(k, _)| k).collect();
        assert_eq!(keys, ["queue", "httpProxy"]);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(RouteConfig::from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let config = RouteConfig::new()
            .processor("a", json!(1))
            .processor("b", json!(2))
            .processor("a", json!(3));

        let entries: Vec<(&str, &Value)> = config.processors().collect();
        assert_eq!(entries, [("a", &json!(3)), ("b", &json!(2))]);
    }

    #[test]
    fn test_reserved_names_never_become_processors() {
        let config = RouteConfig::new()
            .processor(DEBUG_KEY, json!(true))
            .processor(ON_ERROR_KEY, json!(null));
        assert_eq!(config.processor_count(), 0);
        assert!(!config.is_debug());
    }

    #[tokio::test]
    async fn test_error_handler_erases_closure() {
        let config = RouteConfig::new().with_error_handler(error_handler(|err, event, ctx| async move {
            Some(json!({"message": err.message(), "id": event["id"].clone(), "request": ctx.request_id}))
        }));

        let recover = config.error_handler().unwrap();
        let recovered = recover(
            ProcessorError::new("boom"),
            Event::new(json!({"id": 1})),
            InvocationContext::new("req-9"),
        )
        .await;
        assert_eq!(
            recovered,
            Some(json!({"message": "boom", "id": 1, "request": "req-9"}))
        );
    }
}
