//! Helpers shared by the built-in processors for reading their configuration
//! slices and the record-batch event shape.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use switchyard_core::{Event, ProcessorError, ProcessorResult};

/// Parses a processor's configuration slice into its typed form.
pub(crate) fn parse_slice<T: DeserializeOwned>(key: &str, config: &Value) -> ProcessorResult<T> {
    T::deserialize(config).map_err(|e| {
        ProcessorError::new(format!("invalid '{key}' configuration: {e}"))
            .with_name("InvalidConfig")
    })
}

/// Compiles a route pattern from configuration.
pub(crate) fn compile_pattern(pattern: &str) -> ProcessorResult<Regex> {
    Regex::new(pattern).map_err(|e| {
        ProcessorError::new(format!("invalid route pattern '{pattern}': {e}"))
            .with_name("InvalidConfig")
    })
}

/// Compiles the pattern of every route up front, so a bad pattern is
/// reported even when an earlier route would have matched.
pub(crate) fn compile_routes<'a, R>(
    routes: &'a [R],
    pattern: impl Fn(&R) -> &str,
) -> ProcessorResult<Vec<(Regex, &'a R)>> {
    routes
        .iter()
        .map(|route| Ok((compile_pattern(pattern(route))?, route)))
        .collect()
}

/// Returns the `eventSource` of the first record, if the event is a record batch.
///
/// Pub/sub notifications spell the field `EventSource`; both are accepted.
pub(crate) fn record_source(event: &Event) -> Option<&str> {
    let record = event.records()?.first()?;
    record
        .get("eventSource")
        .or_else(|| record.get("EventSource"))
        .and_then(Value::as_str)
}
