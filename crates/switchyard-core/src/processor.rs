//! The event processor capability.
//!
//! A processor inspects an incoming event and decides whether it is
//! responsible for it. Built-in processors understand the common host event
//! shapes; applications add their own by implementing [`EventProcessor`] or
//! by wrapping a closure with [`processor_fn`].
//!
//! ```rust,ignore
//! use switchyard_core::{processor_fn, Outcome};
//!
//! let ping = processor_fn(|_config, event, _ctx| async move {
//!     if event.get("ping").is_some() {
//!         Outcome::Completed(serde_json::json!("pong"))
//!     } else {
//!         Outcome::Skipped
//!     }
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::event::{Event, InvocationContext};
use crate::outcome::Outcome;

/// A handler for one family of events.
///
/// `process` receives the configuration slice registered under the
/// processor's key, the event, and the invocation context. It returns
/// [`Outcome::Skipped`] when the event is not its concern.
#[async_trait]
pub trait EventProcessor: Send + Sync {
    /// Offers an event to this processor.
    async fn process(&self, config: &Value, event: &Event, ctx: &InvocationContext) -> Outcome;
}

/// A shared processor trait object.
pub type BoxedProcessor = Arc<dyn EventProcessor>;

/// A processor backed by a closure.
///
/// The closure receives owned clones of its inputs so the returned future can
/// be `'static`.
pub struct ProcessorFn<F> {
    f: F,
}

/// Wraps a closure as a [`BoxedProcessor`].
pub fn processor_fn<F, Fut>(f: F) -> BoxedProcessor
where
    F: Fn(Value, Event, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    Arc::new(ProcessorFn { f })
}

#[async_trait]
impl<F, Fut> EventProcessor for ProcessorFn<F>
where
    F: Fn(Value, Event, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    async fn process(&self, config: &Value, event: &Event, ctx: &InvocationContext) -> Outcome {
        (self.f)(config.clone(), event.clone(), ctx.clone()).await
    }
}

impl<F> std::fmt::Debug for ProcessorFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorFn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_processor_fn_sees_config_slice() {
        let processor = processor_fn(|config, _event, _ctx| async move {
            Outcome::from_value(config["reply"].clone())
        });

        let outcome = processor
            .process(
                &json!({"reply": "hi"}),
                &Event::new(json!({})),
                &InvocationContext::new("req"),
            )
            .await;

        assert!(matches!(outcome, Outcome::Completed(v) if v == "hi"));
    }
}
