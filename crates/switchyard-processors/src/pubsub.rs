//! Pub/sub notification processor (`pubsub`).
//!
//! Claims topic notifications (`EventSource == "aws:sns"`). The first route
//! whose `topic` pattern matches the notification's `TopicArn` receives the
//! notification object.
//!
//! ```json
//! { "routes": [ { "topic": ":orders$", "action": "onOrder" } ] }
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use switchyard_core::{Event, EventProcessor, InvocationContext, Outcome};
use tracing::debug;

use crate::action::ActionTable;
use crate::slice::{compile_routes, parse_slice, record_source};

/// Configuration key of this processor.
pub const KEY: &str = "pubsub";

const EVENT_SOURCE: &str = "aws:sns";

#[derive(Debug, Deserialize)]
struct PubSubConfig {
    #[serde(default)]
    routes: Vec<TopicRoute>,
}

#[derive(Debug, Deserialize)]
struct TopicRoute {
    topic: String,
    action: String,
}

/// Processor for pub/sub topic notifications.
#[derive(Debug, Clone)]
pub struct PubSubProcessor {
    actions: ActionTable,
}

impl PubSubProcessor {
    /// Creates the processor over the given action table.
    pub fn new(actions: ActionTable) -> Self {
        Self { actions }
    }
}

#[async_trait]
impl EventProcessor for PubSubProcessor {
    async fn process(&self, config: &Value, event: &Event, ctx: &InvocationContext) -> Outcome {
        if record_source(event) != Some(EVENT_SOURCE) {
            return Outcome::Skipped;
        }
        let Some(notification) = event
            .records()
            .and_then(|records| records.first())
            .and_then(|record| record.get("Sns"))
        else {
            return Outcome::Skipped;
        };

        let config: PubSubConfig = match parse_slice(KEY, config) {
            Ok(config) => config,
            Err(err) => return Outcome::Failed(err),
        };

        let topic_arn = notification
            .get("TopicArn")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let routes = match compile_routes(&config.routes, |route| route.topic.as_str()) {
            Ok(routes) => routes,
            Err(err) => return Outcome::Failed(err),
        };

        for (pattern, route) in routes {
            if pattern.is_match(topic_arn) {
                debug!(topic = topic_arn, action = %route.action, "Pub/sub route matched");
                return self
                    .actions
                    .invoke(&route.action, notification.clone(), ctx)
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

    fn notification(topic: &str) -> Event {
        Event::new(json!({
            "Records": [{
                "EventSource": "aws:sns",
                "Sns": { "TopicArn": topic, "Subject": "created", "Message": "{\"id\":1}" }
            }]
        }))
    }

    fn processor() -> PubSubProcessor {
        PubSubProcessor::new(ActionTable::new().action("onOrder", |sns, _ctx| async move {
            Ok(json!({ "handled": sns["Subject"] }))
        }))
    }

    #[tokio::test]
    async fn test_matching_topic() {
        let config = json!({"routes": [{"topic": ":orders$", "action": "onOrder"}]});
        let outcome = processor()
            .process(
                &config,
                &notification("arn:aws:sns:eu-west-1:1:orders"),
                &InvocationContext::new("req"),
            )
            .await;

        assert!(matches!(outcome, Outcome::Completed(v) if v == json!({"handled": "created"})));
    }

    #[tokio::test]
    async fn test_unmatched_topic_skips() {
        let config = json!({"routes": [{"topic": ":orders$", "action": "onOrder"}]});
        let outcome = processor()
            .process(
                &config,
                &notification("arn:aws:sns:eu-west-1:1:billing"),
                &InvocationContext::new("req"),
            )
            .await;
        assert!(outcome.is_skipped());
    }

    #[tokio::test]
    async fn test_bad_pattern_behind_matching_route_fails() {
        let config = json!({"routes": [
            {"topic": ":orders$", "action": "onOrder"},
            {"topic": "[", "action": "onOrder"}
        ]});
        let outcome = processor()
            .process(
                &config,
                &notification("arn:aws:sns:eu-west-1:1:orders"),
                &InvocationContext::new("req"),
            )
            .await;
        assert!(matches!(outcome, Outcome::Failed(err) if err.name() == Some("InvalidConfig")));
    }

    #[tokio::test]
    async fn test_other_sources_skip() {
        let event = Event::new(json!({"Records": [{"eventSource": "aws:sqs"}]}));
        let outcome = processor()
            .process(&json!({}), &event, &InvocationContext::new("req"))
            .await;
        assert!(outcome.is_skipped());
    }
}
