//! # Switchyard
//!
//! Configuration-driven event routing for serverless functions.
//!
//! A single function entry point receives events from many sources: API
//! gateway requests, topic notifications, queue batches, object storage
//! notifications. Switchyard offers each event to the configured processors
//! in order, and the first one that claims it produces the response.
//!
//! ```text
//! ┌──────────┐     ┌────────────┐     ┌─────────────────────────┐
//! │   Host   │────▶│ Dispatcher │────▶│ httpProxy     (skipped) │
//! │ (invoke) │     │            │────▶│ queue         (claims)  │──▶ action "processOrders"
//! └──────────┘     └────────────┘     │ objectStorage (not run) │
//!                                     └─────────────────────────┘
//! ```
//!
//! - **Runtime**: loads configuration, sets up logging, builds the handler
//! - **Processors**: built-in or custom handlers for one family of events
//! - **Actions**: named application functions that built-in routes point at
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use switchyard::prelude::*;
//!
//! let runtime = SwitchyardRuntime::builder()
//!     .action("processOrders", |messages, _ctx| async move {
//!         Ok(json!({ "status": "ok", "received": messages }))
//!     })
//!     .build()?;
//!
//! let handler = runtime.handler().into_fn();
//! ```
//!
//! with a `switchyard.toml` next to the binary:
//!
//! ```toml
//! [[router.processors]]
//! key = "queue"
//!
//! [router.processors.config]
//! routes = [{ source = "orders-queue$", action = "processOrders" }]
//! ```
//!
//! ## Custom Processors
//!
//! Crates using `#[register_processor]` must also depend on `switchyard-core`,
//! which the expansion refers to by path.
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use switchyard_core as core;
pub use switchyard_processors as processors;
pub use switchyard_runtime as runtime;

pub use async_trait::async_trait;
pub use switchyard_macros::register_processor;

/// Prelude module for convenient imports.
pub mod prelude {
    // Runtime - main entry point
    pub use switchyard_runtime::{SwitchyardConfig, SwitchyardRuntime};

    // Processor capability
    pub use switchyard_core::{
        BoxedProcessor, Event, EventProcessor, InvocationContext, Outcome, ProcessorError,
        ProcessorResult, RouteConfig, RouterHandler, processor_fn,
    };
    pub use switchyard_macros::register_processor;

    // Built-in processors
    pub use switchyard_processors::ActionTable;

    pub use async_trait::async_trait;
}
