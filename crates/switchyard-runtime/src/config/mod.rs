//! Configuration module for the Switchyard runtime.
//!
//! Loads [`SwitchyardConfig`] from files, environment variables and
//! programmatic overrides, then validates it.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, ProcessorSettings,
    RouterSettings, SpanEventConfig, SwitchyardConfig,
};
pub use validation::validate_config;
