//! Unified error types for the Switchyard core.
//!
//! Errors are split by the phase in which they occur:
//!
//! - [`SetupError`] aborts construction of a dispatcher, before any event is seen.
//! - [`ProcessorError`] is reported by a single processor for a single event.
//! - [`DispatchError`] is the final failure of one invocation.

use std::sync::Arc;

use thiserror::Error;

// =============================================================================
// Setup Errors
// =============================================================================

/// Errors that can occur while building a dispatcher from a route config.
#[derive(Debug, Clone, Error)]
pub enum SetupError {
    /// A configured processor key could not be resolved to a processor.
    #[error(
        "The event processor '{key}', that is mentioned in the route config, cannot be instantiated ({reason})"
    )]
    UnresolvedProcessor {
        /// The offending configuration key.
        key: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The route config itself is malformed.
    #[error("invalid route config: {0}")]
    InvalidConfig(String),
}

impl SetupError {
    /// Creates an unresolved processor error.
    pub fn unresolved(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnresolvedProcessor {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Processor Errors
// =============================================================================

/// A failure reported by an event processor while handling an event.
///
/// Carries a human-readable message plus optional diagnostics. The string
/// form (`Display`) is what a host eventually sees when the failure is not
/// recovered: `"<name>: <message>"` when a name is set, the bare message
/// otherwise.
#[derive(Debug, Clone, Error)]
#[error("{}", render(.name.as_deref(), .message))]
pub struct ProcessorError {
    message: String,
    name: Option<String>,
    trace: Option<String>,
    #[source]
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

fn render(name: Option<&str>, message: &str) -> String {
    match name {
        Some(name) => format!("{name}: {message}"),
        None => message.to_string(),
    }
}

impl ProcessorError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            name: None,
            trace: None,
            source: None,
        }
    }

    /// Wraps an underlying error, taking its string form as the message.
    pub fn from_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: err.to_string(),
            name: None,
            trace: None,
            source: Some(Arc::new(err)),
        }
    }

    /// Sets the error class name (e.g. `"NotFound"`).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches a diagnostic trace.
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Returns the message without the name prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the error class name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the diagnostic trace, if any.
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }
}

impl From<serde_json::Error> for ProcessorError {
    fn from(err: serde_json::Error) -> Self {
        Self::from_error(err).with_name("SerializationError")
    }
}

// =============================================================================
// Dispatch Errors
// =============================================================================

/// The final failure of a single invocation.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// A processor failed and the failure was not recovered.
    #[error("{error}")]
    Processor {
        /// Key of the processor that failed.
        key: String,
        /// The processor's error.
        #[source]
        error: ProcessorError,
    },

    /// Every configured processor declined the event.
    #[error("No event processor found to handle this kind of event!")]
    NoProcessorFound,
}

impl DispatchError {
    /// Returns the key of the failing processor, if any.
    pub fn processor_key(&self) -> Option<&str> {
        match self {
            Self::Processor { key, .. } => Some(key),
            Self::NoProcessorFound => None,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for setup operations.
pub type SetupResult<T> = Result<T, SetupError>;

/// Result type for processor actions.
pub type ProcessorResult<T> = Result<T, ProcessorError>;

/// Result type for dispatching an event.
pub type DispatchResult<T> = Result<T, DispatchError>;
