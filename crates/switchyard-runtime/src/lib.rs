//! Switchyard Runtime - configuration, logging and wiring for the event router.
//!
//! This crate provides:
//! - Layered configuration loading with figment ([`config`])
//! - Logging setup on `tracing-subscriber` ([`logging`])
//! - [`SwitchyardRuntime`], which turns a configuration plus registered
//!   actions and processors into a host-facing handler
//!
//! ```ignore
//! use switchyard_runtime::SwitchyardRuntime;
//!
//! let runtime = SwitchyardRuntime::builder()
//!     .profile("production")
//!     .action("processOrders", |messages, _ctx| async move { Ok(messages) })
//!     .build()?;
//!
//! let result = runtime.invoke(event, ctx).await;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{
    ConfigError, ConfigLoader, ConfigResult, LoggingConfig, ProcessorSettings, RouterSettings,
    SwitchyardConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{RuntimeBuilder, SwitchyardRuntime};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
