//! Built-in event processors for the Switchyard event router.
//!
//! This crate provides the fixed built-in processor set:
//!
//! | Key             | Claims                                   |
//! |-----------------|------------------------------------------|
//! | `httpProxy`     | API gateway proxy requests               |
//! | `pubsub`        | Topic notifications                      |
//! | `queue`         | Queue message batches                    |
//! | `objectStorage` | Object storage notifications             |
//!
//! Each processor routes the events it claims to named actions held in an
//! [`ActionTable`].
//!
//! ```rust,ignore
//! use switchyard_processors::{builtin_registry, ActionTable};
//!
//! let actions = ActionTable::new()
//!     .action("processOrders", |messages, _ctx| async move { Ok(json!({"status": "ok"})) });
//!
//! let registry = builtin_registry(actions);
//! ```

pub mod action;
pub mod http_proxy;
pub mod object_storage;
pub mod pubsub;
pub mod queue;
mod slice;

use std::sync::Arc;

use switchyard_core::ProcessorRegistry;

pub use action::{Action, ActionTable};
pub use http_proxy::HttpProxyProcessor;
pub use object_storage::ObjectStorageProcessor;
pub use pubsub::PubSubProcessor;
pub use queue::QueueProcessor;

/// Keys of the built-in processors.
pub const BUILTIN_KEYS: [&str; 4] = [
    http_proxy::KEY,
    pubsub::KEY,
    queue::KEY,
    object_storage::KEY,
];

/// Installs the built-in processors into an existing registry.
pub fn install(registry: ProcessorRegistry, actions: &ActionTable) -> ProcessorRegistry {
    registry
        .with_builtin(
            http_proxy::KEY,
            Arc::new(HttpProxyProcessor::new(actions.clone())),
        )
        .with_builtin(pubsub::KEY, Arc::new(PubSubProcessor::new(actions.clone())))
        .with_builtin(queue::KEY, Arc::new(QueueProcessor::new(actions.clone())))
        .with_builtin(
            object_storage::KEY,
            Arc::new(ObjectStorageProcessor::new(actions.clone())),
        )
}

/// Creates a registry holding exactly the built-in processors.
pub fn builtin_registry(actions: ActionTable) -> ProcessorRegistry {
    install(ProcessorRegistry::new(), &actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchyard_core::{InvocationContext, RouteConfig, handler};

    #[test]
    fn test_every_builtin_key_resolves() {
        let registry = builtin_registry(ActionTable::new());
        for key in BUILTIN_KEYS {
            assert!(registry.resolve(key).is_ok(), "{key} should resolve");
        }
    }

    #[tokio::test]
    async fn test_routes_across_builtins() {
        let actions = ActionTable::new()
            .action("processOrders", |_messages, _ctx| async move {
                Ok(json!({"status": "ok"}))
            })
            .action("ping", |_request, _ctx| async move { Ok(json!("pong")) });

        let config = RouteConfig::from_json(json!({
            "httpProxy": {"routes": [{"method": "GET", "path": "/ping", "action": "ping"}]},
            "queue": {"routes": [{"source": "orders", "action": "processOrders"}]},
            "debug": false
        }))
        .unwrap();

        let handle = handler(config, &builtin_registry(actions)).unwrap();

        let queued = handle
            .call(
                json!({"Records": [{"eventSource": "aws:sqs", "eventSourceARN": "arn:orders", "body": "{}"}]}),
                InvocationContext::new("1"),
            )
            .await;
        assert_eq!(queued, Ok(json!({"status": "ok"})));

        let http = handle
            .call(
                json!({"httpMethod": "GET", "path": "/ping"}),
                InvocationContext::new("2"),
            )
            .await
            .unwrap();
        assert_eq!(http["body"], "\"pong\"");

        let unknown = handle
            .call(json!({"source": "aws.events"}), InvocationContext::new("3"))
            .await;
        assert_eq!(
            unknown,
            Err("No event processor found to handle this kind of event!".to_string())
        );
    }
}
