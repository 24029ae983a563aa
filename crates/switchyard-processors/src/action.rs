//! Named actions invoked by the built-in processors.
//!
//! Routes in a processor's configuration slice refer to their action by
//! name, which keeps the slices plain JSON that can live in a config file.
//! The code behind each name is registered here.
//!
//! ```rust,ignore
//! let actions = ActionTable::new()
//!     .action("listUsers", |request, _ctx| async move {
//!         Ok(json!([{ "id": 1 }]))
//!     });
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use switchyard_core::{InvocationContext, ProcessorError, ProcessorResult};

/// An action: receives the processor-specific payload and the invocation context.
pub type Action = Arc<
    dyn Fn(Value, InvocationContext) -> BoxFuture<'static, ProcessorResult<Value>> + Send + Sync,
>;

/// Maps action names to their implementations.
#[derive(Clone, Default)]
pub struct ActionTable {
    actions: HashMap<String, Action>,
}

impl ActionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an async closure under `name` (builder pattern).
    pub fn action<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProcessorResult<Value>> + Send + 'static,
    {
        self.insert(name, f);
        self
    }

    /// Registers an async closure under `name` in place.
    pub fn insert<F, Fut>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Value, InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProcessorResult<Value>> + Send + 'static,
    {
        let action: Action =
            Arc::new(move |payload: Value, ctx: InvocationContext| f(payload, ctx).boxed());
        self.actions.insert(name.into(), action);
    }

    /// Looks up an action.
    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Looks up an action, failing with a processor error when it is missing.
    pub fn require(&self, name: &str) -> ProcessorResult<&Action> {
        self.get(name).ok_or_else(|| {
            ProcessorError::new(format!("no action registered under '{name}'"))
                .with_name("UnknownAction")
        })
    }

    /// Invokes the named action.
    pub async fn invoke(
        &self,
        name: &str,
        payload: Value,
        ctx: &InvocationContext,
    ) -> ProcessorResult<Value> {
        let action = self.require(name)?;
        action(payload, ctx.clone()).await
    }

    /// Returns registered action names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl std::fmt::Debug for ActionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionTable")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_invoke_registered_action() {
        let actions = ActionTable::new().action("double", |payload, _ctx| async move {
            Ok(json!(payload.as_i64().unwrap_or(0) * 2))
        });

        let ctx = InvocationContext::new("req");
        let result = actions.invoke("double", json!(21), &ctx).await.unwrap();
        assert_eq!(result, json!(42));
    }

    #[tokio::test]
    async fn test_missing_action_is_named_error() {
        let actions = ActionTable::new();
        let ctx = InvocationContext::new("req");
        let err = actions.invoke("nope", json!(null), &ctx).await.unwrap_err();
        assert_eq!(err.name(), Some("UnknownAction"));
        assert!(err.message().contains("'nope'"));
    }
}
