//! Event dispatcher for the Switchyard router.
//!
//! The [`Dispatcher`] is built once from a [`RouteConfig`] and a
//! [`ProcessorRegistry`], then reused for every invocation. When an event is
//! dispatched:
//!
//! 1. Processors are tried in configuration order
//! 2. The first processor that completes decides the result
//! 3. A processor failure ends the dispatch, optionally recovered by the
//!    configured error handler
//! 4. If every processor skips, dispatch fails with
//!    [`DispatchError::NoProcessorFound`]
//!
//! ```rust,ignore
//! use switchyard_core::{Dispatcher, RouteConfig};
//!
//! let config = RouteConfig::new()
//!     .processor("httpProxy", json!({ "routes": [...] }))
//!     .processor("queue", json!({ "routes": [...] }));
//!
//! let dispatcher = Dispatcher::new(config, &registry)?;
//! let result = dispatcher.dispatch(event, ctx).await?;
//! ```

use serde_json::Value;
use tracing::{Instrument, Level, debug, error, info, span};

use crate::config::{ErrorHandler, RouteConfig};
use crate::error::{DispatchError, DispatchResult, ProcessorError, SetupResult};
use crate::event::{Event, InvocationContext};
use crate::outcome::Outcome;
use crate::processor::BoxedProcessor;
use crate::registry::ProcessorRegistry;

/// One resolved entry of the processor mapping.
struct Route {
    key: String,
    processor: BoxedProcessor,
    config: Value,
}

/// The central event dispatcher.
///
/// The processor mapping is resolved eagerly at construction and never
/// changes afterwards, so a `Dispatcher` can be shared across concurrent
/// invocations behind an `Arc` without locking.
pub struct Dispatcher {
    /// Resolved processors in trial order.
    routes: Vec<Route>,
    /// Whether diagnostic logging is enabled.
    debug: bool,
    /// Recovery hook for processor failures.
    on_error: Option<ErrorHandler>,
}

impl Dispatcher {
    /// Resolves every configured processor and builds the dispatcher.
    ///
    /// Fails on the first key the registry cannot resolve; no dispatcher is
    /// produced in that case.
    pub fn new(config: RouteConfig, registry: &ProcessorRegistry) -> SetupResult<Self> {
        let mut routes = Vec::with_capacity(config.processor_count());

        for (key, slice) in config.processors() {
            let processor = registry.resolve(key)?;
            debug!(key, "Resolved event processor");
            routes.push(Route {
                key: key.to_string(),
                processor,
                config: slice.clone(),
            });
        }

        Ok(Self {
            routes,
            debug: config.is_debug(),
            on_error: config.error_handler().cloned(),
        })
    }

    /// Returns the configured processor keys in trial order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.key.as_str())
    }

    /// Returns the number of resolved processors.
    pub fn processor_count(&self) -> usize {
        self.routes.len()
    }

    /// Returns whether diagnostic logging is enabled.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Dispatches an event to the configured processors.
    ///
    /// # Returns
    ///
    /// The value produced by the first processor that completes, or the
    /// error handler's replacement value after a recovered failure.
    pub async fn dispatch(&self, event: Event, ctx: InvocationContext) -> DispatchResult<Value> {
        let span = span!(Level::DEBUG, "dispatch", request_id = %ctx.request_id);
        self.dispatch_inner(event, ctx).instrument(span).await
    }

    async fn dispatch_inner(&self, event: Event, ctx: InvocationContext) -> DispatchResult<Value> {
        if self.debug {
            info!(event = %event.payload(), "Router invoked with event");
            info!(context = ?ctx, "Router invoked with context");
        }

        for route in &self.routes {
            match route.processor.process(&route.config, &event, &ctx).await {
                Outcome::Completed(value) if !value.is_null() => {
                    debug!(key = %route.key, "Event processor handled event");
                    return Ok(value);
                }
                // A null completion declines like a skip.
                Outcome::Completed(_) | Outcome::Skipped => {
                    if self.debug {
                        info!(key = %route.key, "Event processor couldn't handle request");
                    }
                }
                Outcome::Failed(err) => {
                    return self.recover(&route.key, err, event, ctx).await;
                }
            }
        }

        Err(DispatchError::NoProcessorFound)
    }

    /// Handles a processor failure: log it, then give the error handler a
    /// chance to replace it with a result.
    async fn recover(
        &self,
        key: &str,
        err: ProcessorError,
        event: Event,
        ctx: InvocationContext,
    ) -> DispatchResult<Value> {
        match err.trace() {
            Some(trace) => error!(key, error = %err, trace, "Event processor failed"),
            None => error!(key, error = %err, "Event processor failed"),
        }

        if let Some(handler) = &self.on_error
            && let Some(value) = handler(err.clone(), event, ctx).await
            && !value.is_null()
        {
            debug!(key, "Error handler recovered processor failure");
            return Ok(value);
        }

        Err(DispatchError::Processor {
            key: key.to_string(),
            error: err,
        })
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("debug", &self.debug)
            .field("has_error_handler", &self.on_error.is_some())
            .finish()
    }
}
