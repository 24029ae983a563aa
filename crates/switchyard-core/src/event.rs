//! Event and invocation context types.
//!
//! An [`Event`] is the raw payload handed over by the serverless host. Its
//! shape depends on whichever external system triggered the invocation and
//! is only ever interpreted by processors, never by the dispatcher.

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A type-erased incoming event.
///
/// `Event` wraps the payload in an `Arc`, so cloning it into an error handler
/// or a spawned task does not copy the JSON tree.
#[derive(Clone, PartialEq)]
pub struct Event {
    inner: Arc<Value>,
}

impl Event {
    /// Creates a new event from a raw JSON payload.
    pub fn new(payload: Value) -> Self {
        Self {
            inner: Arc::new(payload),
        }
    }

    /// Returns the raw payload.
    pub fn payload(&self) -> &Value {
        &self.inner
    }

    /// Returns the `Records` array for record-batch events (queues, storage, pub/sub).
    pub fn records(&self) -> Option<&Vec<Value>> {
        self.inner.get("Records").and_then(Value::as_array)
    }

    /// Clones the payload out of the event.
    pub fn to_value(&self) -> Value {
        self.inner.as_ref().clone()
    }
}

impl Deref for Event {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<Value> for Event {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event({})", self.inner)
    }
}

/// Invocation metadata supplied by the serverless host.
///
/// All fields are optional apart from the request id; hosts fill in what
/// they know. Unknown host-specific fields land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    /// Host-assigned request identifier.
    #[serde(default, alias = "awsRequestId")]
    pub request_id: String,

    /// Name of the deployed function.
    #[serde(default)]
    pub function_name: Option<String>,

    /// Version of the deployed function.
    #[serde(default)]
    pub function_version: Option<String>,

    /// Fully qualified identifier the function was invoked through.
    #[serde(default)]
    pub invoked_function_arn: Option<String>,

    /// Memory limit configured for the function, in megabytes.
    #[serde(default, alias = "memoryLimitInMB")]
    pub memory_limit_mb: Option<u32>,

    /// Invocation deadline as milliseconds since the Unix epoch.
    #[serde(default)]
    pub deadline_ms: Option<u64>,

    /// Any further host-specific fields.
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl InvocationContext {
    /// Creates a context with the given request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Default::default()
        }
    }

    /// Sets the function name.
    pub fn with_function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    /// Sets the invocation deadline.
    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    /// Adds a host-specific field.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
