//! # Switchyard Core
//!
//! The dispatch engine of the Switchyard event router.
//!
//! A serverless function receives events of unknown shape: HTTP proxy calls,
//! pub/sub notifications, queue batches, storage notifications. Switchyard
//! routes each one to the event processor responsible for it.
//!
//! ## Building Blocks
//!
//! - **Events**: the opaque payload and its invocation metadata ([`Event`], [`InvocationContext`])
//! - **Processors**: the capability that claims or declines an event ([`EventProcessor`], [`Outcome`])
//! - **Registry**: configuration keys to processor instances ([`ProcessorRegistry`])
//! - **Dispatcher**: ordered, first-match-wins trial of processors ([`Dispatcher`])
//! - **Handler**: the host-facing entry point ([`handler`], [`RouterHandler`])
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌─────────────┐
//! │ RouteConfig │────▶│  Registry  │────▶│ Dispatcher  │
//! └─────────────┘     └────────────┘     └──────┬──────┘
//!                                               │ event
//!                              ┌────────────────┼────────────────┐
//!                              ▼                ▼                ▼
//!                         httpProxy           queue      objectStorage
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use switchyard_core::{handler, processor_fn, Outcome, ProcessorRegistry, RouteConfig};
//! use serde_json::json;
//!
//! let registry = ProcessorRegistry::new().register(
//!     "ping",
//!     processor_fn(|_config, event, _ctx| async move {
//!         if event.get("ping").is_some() {
//!             Outcome::Completed(json!("pong"))
//!         } else {
//!             Outcome::Skipped
//!         }
//!     }),
//! );
//!
//! let config = RouteConfig::new().processor("ping", json!({})).debug(true);
//! let handle = handler(config, &registry)?.into_fn();
//!
//! let reply = handle(json!({"ping": 1}), InvocationContext::new("req-1")).await;
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;
pub mod outcome;
pub mod processor;
pub mod registry;

pub use config::{
    DEBUG_KEY, ErrorHandler, ON_ERROR_KEY, RouteConfig, error_handler, is_reserved_key,
};
pub use dispatcher::Dispatcher;
pub use error::{
    DispatchError, DispatchResult, ProcessorError, ProcessorResult, SetupError, SetupResult,
};
pub use event::{Event, InvocationContext};
pub use handler::{RouterHandler, handler};
pub use outcome::Outcome;
pub use processor::{BoxedProcessor, EventProcessor, ProcessorFn, processor_fn};
pub use registry::{PROCESSOR_PLUGINS, ProcessorPlugin, ProcessorRegistry};

// Re-exported for `#[register_processor]` expansions.
#[doc(hidden)]
pub use linkme;

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        BoxedProcessor, Event, EventProcessor, InvocationContext, Outcome, ProcessorError,
        ProcessorRegistry, RouteConfig, processor_fn,
    };
}
