//! Host boundary.
//!
//! [`RouterHandler`] is the object registered with a serverless host. It
//! wraps a shared [`Dispatcher`] and renders failures as plain strings, which
//! is the only place errors are flattened.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::config::RouteConfig;
use crate::dispatcher::Dispatcher;
use crate::error::SetupResult;
use crate::event::{Event, InvocationContext};
use crate::registry::ProcessorRegistry;

/// Builds an invocation handler from a route config.
///
/// Every configured processor is resolved here; an unresolvable key fails
/// the call and no handler is produced.
pub fn handler(config: RouteConfig, registry: &ProcessorRegistry) -> SetupResult<RouterHandler> {
    Dispatcher::new(config, registry).map(RouterHandler::new)
}

/// A cheaply clonable invocation handler.
#[derive(Clone, Debug)]
pub struct RouterHandler {
    dispatcher: Arc<Dispatcher>,
}

impl RouterHandler {
    /// Wraps a built dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Returns the underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handles one invocation.
    ///
    /// Errors are rendered to their string form for the host.
    pub async fn call(&self, event: Value, ctx: InvocationContext) -> Result<Value, String> {
        self.dispatcher
            .dispatch(Event::new(event), ctx)
            .await
            .map_err(|e| e.to_string())
    }

    /// Converts the handler into a plain function suitable for host runtimes.
    pub fn into_fn(
        self,
    ) -> impl Fn(Value, InvocationContext) -> BoxFuture<'static, Result<Value, String>>
    + Clone
    + Send
    + Sync
    + 'static {
        move |event: Value, ctx: InvocationContext| {
            let this = self.clone();
            async move { this.call(event, ctx).await }.boxed()
        }
    }
}
