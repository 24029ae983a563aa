//! The result of offering an event to a single processor.

use serde_json::Value;

use crate::error::ProcessorError;

/// What a processor made of an event.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The event is not meant for this processor; try the next one.
    Skipped,
    /// The processor handled the event; this is the invocation's result.
    Completed(Value),
    /// The processor claimed the event but failed while handling it.
    Failed(ProcessorError),
}

impl Outcome {
    /// Wraps a result value, treating JSON `null` as "not mine".
    pub fn from_value(value: Value) -> Self {
        if value.is_null() {
            Self::Skipped
        } else {
            Self::Completed(value)
        }
    }

    /// Returns `true` if the processor declined the event.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Returns the short kind label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
        }
    }
}

impl From<Option<Value>> for Outcome {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Skipped, Self::from_value)
    }
}

impl<E: Into<ProcessorError>> From<Result<Option<Value>, E>> for Outcome {
    fn from(result: Result<Option<Value>, E>) -> Self {
        match result {
            Ok(value) => value.into(),
            Err(err) => Self::Failed(err.into()),
        }
    }
}

impl<E: Into<ProcessorError>> From<Result<Value, E>> for Outcome {
    fn from(result: Result<Value, E>) -> Self {
        match result {
            Ok(value) => Self::from_value(value),
            Err(err) => Self::Failed(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_skipped() {
        assert!(Outcome::from_value(Value::Null).is_skipped());
        assert!(Outcome::from(None).is_skipped());
        assert!(matches!(
            Outcome::from_value(json!({"status": "ok"})),
            Outcome::Completed(_)
        ));
    }

    #[test]
    fn test_from_result() {
        let ok: Result<Value, ProcessorError> = Ok(json!(1));
        assert_eq!(Outcome::from(ok).kind(), "completed");

        let err: Result<Option<Value>, ProcessorError> = Err(ProcessorError::new("nope"));
        assert_eq!(Outcome::from(err).kind(), "failed");
    }
}
