//! Object storage notification processor (`objectStorage`).
//!
//! Claims storage notifications (`eventSource == "aws:s3"`). Every record is
//! offered to the routes in order; the first route whose conditions all hold
//! receives the record. Results are collected per handled record.
//!
//! ```json
//! {
//!   "routes": [
//!     { "bucketName": "^uploads$", "eventName": "^ObjectCreated:", "objectKeyPrefix": "images/", "action": "thumbnail" }
//!   ]
//! }
//! ```

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use switchyard_core::{Event, EventProcessor, InvocationContext, Outcome, ProcessorResult};
use tracing::debug;

use crate::action::ActionTable;
use crate::slice::{compile_pattern, parse_slice, record_source};

/// Configuration key of this processor.
pub const KEY: &str = "objectStorage";

const EVENT_SOURCE: &str = "aws:s3";

#[derive(Debug, Deserialize)]
struct ObjectStorageConfig {
    #[serde(default)]
    routes: Vec<StorageRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageRoute {
    #[serde(default)]
    bucket_name: Option<String>,
    #[serde(default)]
    event_name: Option<String>,
    #[serde(default)]
    object_key_prefix: Option<String>,
    action: String,
}

/// A route with its patterns compiled.
struct CompiledRoute<'a> {
    bucket_name: Option<Regex>,
    event_name: Option<Regex>,
    object_key_prefix: Option<&'a str>,
    action: &'a str,
}

impl<'a> CompiledRoute<'a> {
    fn compile(route: &'a StorageRoute) -> ProcessorResult<Self> {
        Ok(Self {
            bucket_name: route.bucket_name.as_deref().map(compile_pattern).transpose()?,
            event_name: route.event_name.as_deref().map(compile_pattern).transpose()?,
            object_key_prefix: route.object_key_prefix.as_deref(),
            action: &route.action,
        })
    }

    fn matches(&self, record: &Value) -> bool {
        let bucket = record["s3"]["bucket"]["name"].as_str().unwrap_or_default();
        let key = record["s3"]["object"]["key"].as_str().unwrap_or_default();
        let event_name = record["eventName"].as_str().unwrap_or_default();

        self.bucket_name.as_ref().is_none_or(|re| re.is_match(bucket))
            && self.event_name.as_ref().is_none_or(|re| re.is_match(event_name))
            && self.object_key_prefix.is_none_or(|prefix| key.starts_with(prefix))
    }
}

/// Processor for object storage notifications.
#[derive(Debug, Clone)]
pub struct ObjectStorageProcessor {
    actions: ActionTable,
}

impl ObjectStorageProcessor {
    /// Creates the processor over the given action table.
    pub fn new(actions: ActionTable) -> Self {
        Self { actions }
    }

    async fn handle(
        &self,
        config: &ObjectStorageConfig,
        records: &[Value],
        ctx: &InvocationContext,
    ) -> ProcessorResult<Option<Value>> {
        let routes = config
            .routes
            .iter()
            .map(CompiledRoute::compile)
            .collect::<ProcessorResult<Vec<_>>>()?;

        let mut results = Vec::new();
        for record in records {
            let Some(route) = routes.iter().find(|route| route.matches(record)) else {
                continue;
            };
            debug!(action = route.action, "Object storage route matched");
            results.push(self.actions.invoke(route.action, record.clone(), ctx).await?);
        }

        Ok((!results.is_empty()).then_some(Value::Array(results)))
    }
}

#[async_trait]
impl EventProcessor for ObjectStorageProcessor {
    async fn process(&self, config: &Value, event: &Event, ctx: &InvocationContext) -> Outcome {
        if record_source(event) != Some(EVENT_SOURCE) {
            return Outcome::Skipped;
        }
        let Some(records) = event.records() else {
            return Outcome::Skipped;
        };

        let config: ObjectStorageConfig = match parse_slice(KEY, config) {
            Ok(config) => config,
            Err(err) => return Outcome::Failed(err),
        };

        self.handle(&config, records, ctx).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(bucket: &str, key: &str) -> Value {
        json!({
            "eventSource": "aws:s3",
            "eventName": "ObjectCreated:Put",
            "s3": { "bucket": { "name": bucket }, "object": { "key": key } }
        })
    }

    fn processor() -> ObjectStorageProcessor {
        ObjectStorageProcessor::new(ActionTable::new().action("thumbnail", |record, _ctx| async move {
            Ok(record["s3"]["object"]["key"].clone())
        }))
    }

    fn config() -> Value {
        json!({
            "routes": [{
                "bucketName": "^uploads$",
                "eventName": "^ObjectCreated:",
                "objectKeyPrefix": "images/",
                "action": "thumbnail"
            }]
        })
    }

    #[tokio::test]
    async fn test_collects_results_for_matching_records() {
        let event = Event::new(json!({
            "Records": [
                record("uploads", "images/a.png"),
                record("uploads", "docs/readme.md"),
                record("uploads", "images/b.png")
            ]
        }));

        let outcome = processor()
            .process(&config(), &event, &InvocationContext::new("req"))
            .await;

        assert!(
            matches!(outcome, Outcome::Completed(v) if v == json!(["images/a.png", "images/b.png"]))
        );
    }

    #[tokio::test]
    async fn test_no_matching_record_skips() {
        let event = Event::new(json!({ "Records": [record("backups", "images/a.png")] }));
        let outcome = processor()
            .process(&config(), &event, &InvocationContext::new("req"))
            .await;
        assert!(outcome.is_skipped());
    }
}
