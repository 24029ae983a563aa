//! Runtime wiring: configuration, logging, registry and handler.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use switchyard_runtime::SwitchyardRuntime;
//!
//! let runtime = SwitchyardRuntime::builder()
//!     .config_file("switchyard.toml")
//!     .action("processOrders", |messages, _ctx| async move {
//!         Ok(json!({ "status": "ok" }))
//!     })
//!     .on_error(|err, _event, _ctx| async move {
//!         Some(json!({ "recovered": err.message() }))
//!     })
//!     .build()?;
//!
//! let host_fn = runtime.handler().into_fn();
//! ```

use std::future::Future;
use std::path::Path;

use serde_json::Value;
use switchyard_core::{
    BoxedProcessor, DispatchResult, ErrorHandler, Event, InvocationContext, ProcessorError,
    RouterHandler, error_handler, handler,
};
use switchyard_processors::{ActionTable, builtin_registry};
use tracing::{debug, info};

use crate::config::{ConfigLoader, SwitchyardConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// A configured event router ready to serve invocations.
pub struct SwitchyardRuntime {
    config: SwitchyardConfig,
    handler: RouterHandler,
}

impl SwitchyardRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Returns the configuration the runtime was built from.
    pub fn config(&self) -> &SwitchyardConfig {
        &self.config
    }

    /// Returns the host-facing handler.
    pub fn handler(&self) -> RouterHandler {
        self.handler.clone()
    }

    /// Handles one invocation, rendering failures as strings.
    pub async fn invoke(&self, event: Value, ctx: InvocationContext) -> Result<Value, String> {
        self.handler.call(event, ctx).await
    }

    /// Handles one invocation, keeping the typed error.
    pub async fn dispatch(&self, event: Value, ctx: InvocationContext) -> DispatchResult<Value> {
        self.handler
            .dispatcher()
            .dispatch(Event::new(event), ctx)
            .await
    }
}

/// Builder for [`SwitchyardRuntime`].
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    config: Option<SwitchyardConfig>,
    actions: ActionTable,
    processors: Vec<(String, BoxedProcessor)>,
    error_handler: Option<ErrorHandler>,
    init_logging: bool,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
            config: None,
            actions: ActionTable::new(),
            processors: Vec::new(),
            error_handler: None,
            init_logging: true,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Uses an already loaded configuration instead of the loader.
    pub fn config(mut self, config: SwitchyardConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Leaves the global subscriber alone.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    /// Registers a named action for the built-in processors.
    pub fn action<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ProcessorError>> + Send + 'static,
    {
        self.actions.insert(name, f);
        self
    }

    /// Registers a custom processor. It takes precedence over a built-in or
    /// plugin with the same key.
    pub fn processor(mut self, key: impl Into<String>, processor: BoxedProcessor) -> Self {
        self.processors.push((key.into(), processor));
        self
    }

    /// Sets the error handler consulted when a processor fails.
    pub fn on_error<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(ProcessorError, Event, InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Value>> + Send + 'static,
    {
        self.error_handler = Some(error_handler(handler));
        self
    }

    /// Builds the runtime.
    ///
    /// Fails if the configuration cannot be loaded or validated, or if a
    /// configured processor key cannot be resolved.
    pub fn build(self) -> RuntimeResult<SwitchyardRuntime> {
        let config = match self.config {
            Some(config) => config,
            None => self.config_loader.load()?,
        };
        validate_config(&config)?;

        if self.init_logging {
            logging::init_from_config(&config.logging);
        }

        debug!(actions = ?self.actions.names(), "Building processor registry");
        let registry = self
            .processors
            .into_iter()
            .fold(builtin_registry(self.actions), |registry, (key, processor)| {
                registry.register(key, processor)
            });

        let mut route_config = config.router.to_route_config();
        if let Some(error_handler) = self.error_handler {
            route_config = route_config.with_error_handler(error_handler);
        }

        let handler = handler(route_config, &registry)?;

        info!(
            processors = ?handler.dispatcher().keys().collect::<Vec<_>>(),
            debug = handler.dispatcher().is_debug(),
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Ok(SwitchyardRuntime { config, handler })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ProcessorSettings};
    use crate::error::RuntimeError;
    use serde_json::json;
    use switchyard_core::{DispatchError, Outcome, SetupError, processor_fn};

    fn config_with(processors: Vec<ProcessorSettings>) -> SwitchyardConfig {
        let mut config = SwitchyardConfig::default();
        config.router.processors = processors;
        config
    }

    fn queue_event(arn: &str) -> Value {
        json!({"Records": [{"eventSource": "aws:sqs", "eventSourceARN": arn, "body": "{\"id\":7}"}]})
    }

    #[tokio::test]
    async fn test_builtins_receive_registered_actions() {
        let runtime = SwitchyardRuntime::builder()
            .config(config_with(vec![ProcessorSettings::new(
                "queue",
                json!({"routes": [{"source": "orders", "action": "processOrders"}]}),
            )]))
            .action("processOrders", |messages, _ctx| async move {
                Ok(json!({"status": "ok", "count": messages.as_array().map(Vec::len)}))
            })
            .without_logging()
            .build()
            .unwrap();

        let result = runtime
            .invoke(queue_event("arn:orders"), InvocationContext::new("req-1"))
            .await;
        assert_eq!(result, Ok(json!({"status": "ok", "count": 1})));
    }

    #[tokio::test]
    async fn test_custom_processor_overrides_builtin() {
        let runtime = SwitchyardRuntime::builder()
            .config(config_with(vec![ProcessorSettings::new("queue", json!({}))]))
            .processor(
                "queue",
                processor_fn(|_config, _event, _ctx| async { Outcome::Completed(json!("custom")) }),
            )
            .without_logging()
            .build()
            .unwrap();

        let result = runtime
            .invoke(json!({}), InvocationContext::new("req-2"))
            .await;
        assert_eq!(result, Ok(json!("custom")));
    }

    #[tokio::test]
    async fn test_error_handler_recovers() {
        let runtime = SwitchyardRuntime::builder()
            .config(config_with(vec![ProcessorSettings::new(
                "queue",
                json!({"routes": [{"source": "orders", "action": "missing"}]}),
            )]))
            .on_error(|err, _event, _ctx| async move {
                Some(json!({"recovered": err.name()}))
            })
            .without_logging()
            .build()
            .unwrap();

        let result = runtime
            .invoke(queue_event("arn:orders"), InvocationContext::new("req-3"))
            .await;
        assert_eq!(result, Ok(json!({"recovered": "UnknownAction"})));
    }

    #[tokio::test]
    async fn test_unmatched_event_reports_no_processor() {
        let runtime = SwitchyardRuntime::builder()
            .config(config_with(vec![ProcessorSettings::new(
                "pubsub",
                json!({"routes": []}),
            )]))
            .without_logging()
            .build()
            .unwrap();

        let result = runtime
            .dispatch(json!({"detail-type": "Scheduled Event"}), InvocationContext::new("req-4"))
            .await;
        assert!(matches!(result, Err(DispatchError::NoProcessorFound)));
    }

    #[test]
    fn test_unknown_processor_fails_build() {
        let result = SwitchyardRuntime::builder()
            .config(config_with(vec![ProcessorSettings::new("cron", json!({}))]))
            .without_logging()
            .build();

        match result {
            Err(RuntimeError::Setup(SetupError::UnresolvedProcessor { key, .. })) => {
                assert_eq!(key, "cron");
            }
            _ => panic!("expected an unresolved processor error"),
        }
    }

    #[test]
    fn test_invalid_config_fails_build() {
        let result = SwitchyardRuntime::builder()
            .config(config_with(vec![ProcessorSettings::new("debug", json!({}))]))
            .without_logging()
            .build();
        assert!(matches!(
            result,
            Err(RuntimeError::Config(ConfigError::ValidationError { .. }))
        ));
    }

    #[cfg(feature = "toml-config")]
    #[tokio::test]
    async fn test_builds_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("switchyard.toml");
        std::fs::write(
            &path,
            r#"
[[router.processors]]
key = "httpProxy"

[router.processors.config]
routes = [{ method = "GET", path = "/health", action = "health" }]
"#,
        )
        .unwrap();

        let runtime = SwitchyardRuntime::builder()
            .config_file(&path)
            .without_env()
            .without_logging()
            .action("health", |_request, _ctx| async { Ok(json!({"up": true})) })
            .build()
            .unwrap();

        let response = runtime
            .invoke(
                json!({"httpMethod": "GET", "path": "/health"}),
                InvocationContext::new("req-5"),
            )
            .await
            .unwrap();
        assert_eq!(response["statusCode"], 200);
    }
}
