//! Queue message processor (`queue`).
//!
//! Claims queue batches (`eventSource == "aws:sqs"`). The batch is routed by
//! the first record's `eventSourceARN`; the matching action receives every
//! message body in the batch, JSON-decoded where possible.
//!
//! ```json
//! { "routes": [ { "source": "orders-queue$", "action": "processOrders" } ] }
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use switchyard_core::{Event, EventProcessor, InvocationContext, Outcome};
use tracing::debug;

use crate::action::ActionTable;
use crate::slice::{compile_routes, parse_slice, record_source};

/// Configuration key of this processor.
pub const KEY: &str = "queue";

const EVENT_SOURCE: &str = "aws:sqs";

#[derive(Debug, Deserialize)]
struct QueueConfig {
    #[serde(default)]
    routes: Vec<QueueRoute>,
}

#[derive(Debug, Deserialize)]
struct QueueRoute {
    source: String,
    action: String,
}

/// Processor for queue message batches.
#[derive(Debug, Clone)]
pub struct QueueProcessor {
    actions: ActionTable,
}

impl QueueProcessor {
    /// Creates the processor over the given action table.
    pub fn new(actions: ActionTable) -> Self {
        Self { actions }
    }
}

/// Decodes a message body, keeping it as a string when it is not JSON.
fn decode_body(record: &Value) -> Value {
    match record.get("body") {
        Some(Value::String(body)) => {
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.clone()))
        }
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

#[async_trait]
impl EventProcessor for QueueProcessor {
    async fn process(&self, config: &Value, event: &Event, ctx: &InvocationContext) -> Outcome {
        if record_source(event) != Some(EVENT_SOURCE) {
            return Outcome::Skipped;
        }
        let Some(records) = event.records() else {
            return Outcome::Skipped;
        };

        let config: QueueConfig = match parse_slice(KEY, config) {
            Ok(config) => config,
            Err(err) => return Outcome::Failed(err),
        };

        let source_arn = records
            .first()
            .and_then(|record| record.get("eventSourceARN"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        let routes = match compile_routes(&config.routes, |route| route.source.as_str()) {
            Ok(routes) => routes,
            Err(err) => return Outcome::Failed(err),
        };

        for (pattern, route) in routes {
            if pattern.is_match(source_arn) {
                let messages: Vec<Value> = records.iter().map(decode_body).collect();
                debug!(
                    source = source_arn,
                    action = %route.action,
                    count = messages.len(),
                    "Queue route matched"
                );
                return self
                    .actions
                    .invoke(&route.action, Value::Array(messages), ctx)
                    .await
                    .into();
            }
        }

        Outcome::Skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn batch(arn: &str) -> Event {
        Event::new(json!({
            "Records": [
                { "eventSource": "aws:sqs", "eventSourceARN": arn, "body": "{\"id\":1}" },
                { "eventSource": "aws:sqs", "eventSourceARN": arn, "body": "plain text" }
            ]
        }))
    }

    fn processor() -> QueueProcessor {
        QueueProcessor::new(
            ActionTable::new().action("processOrders", |messages, _ctx| async move {
                Ok(json!({ "status": "ok", "received": messages }))
            }),
        )
    }

    fn config() -> Value {
        json!({"routes": [{"source": "orders-queue$", "action": "processOrders"}]})
    }

    #[tokio::test]
    async fn test_batch_goes_to_matching_route() {
        let outcome = processor()
            .process(
                &config(),
                &batch("arn:aws:sqs:eu-west-1:1:orders-queue"),
                &InvocationContext::new("req"),
            )
            .await;

        match outcome {
            Outcome::Completed(value) => {
                assert_eq!(value["status"], "ok");
                assert_eq!(value["received"], json!([{"id": 1}, "plain text"]));
            }
            other => panic!("expected completion, got {}", other.kind()),
        }
    }

    #[tokio::test]
    async fn test_unrouted_queue_skips() {
        let outcome = processor()
            .process(
                &config(),
                &batch("arn:aws:sqs:eu-west-1:1:audit-queue"),
                &InvocationContext::new("req"),
            )
            .await;
        assert!(outcome.is_skipped());
    }

    #[tokio::test]
    async fn test_bad_pattern_behind_matching_route_fails() {
        let config = json!({"routes": [
            {"source": "orders-queue$", "action": "processOrders"},
            {"source": "(", "action": "processOrders"}
        ]});
        let outcome = processor()
            .process(
                &config,
                &batch("arn:aws:sqs:eu-west-1:1:orders-queue"),
                &InvocationContext::new("req"),
            )
            .await;
        assert!(matches!(outcome, Outcome::Failed(err) if err.name() == Some("InvalidConfig")));
    }

    #[tokio::test]
    async fn test_invalid_slice_fails() {
        let outcome = processor()
            .process(
                &json!({"routes": [{"source": "("}]}),
                &batch("arn:aws:sqs:eu-west-1:1:orders-queue"),
                &InvocationContext::new("req"),
            )
            .await;
        assert!(matches!(outcome, Outcome::Failed(_)));
    }
}
