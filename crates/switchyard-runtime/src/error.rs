//! Runtime error types.

use switchyard_core::SetupError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while building a runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Loading or validating the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A configured processor could not be set up.
    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
