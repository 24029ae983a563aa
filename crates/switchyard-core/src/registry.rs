//! Processor registry.
//!
//! The registry turns configuration keys into processor instances. Three
//! sources are consulted, in this order:
//!
//! 1. Processors registered explicitly with [`ProcessorRegistry::register`].
//! 2. The built-in set installed with [`ProcessorRegistry::with_builtin`].
//! 3. Link-time plugins contributed through the [`PROCESSOR_PLUGINS`]
//!    distributed slice (usually via `#[register_processor("key")]`).
//!
//! New event sources can therefore be added without touching the dispatcher.
//!
//! ```rust,ignore
//! let registry = ProcessorRegistry::new()
//!     .with_builtin("queue", Arc::new(QueueProcessor::new(actions)))
//!     .register("audit", processor_fn(audit));
//!
//! let processor = registry.resolve("queue")?;
//! ```

use std::collections::HashMap;

use linkme::distributed_slice;
use tracing::{debug, warn};

use crate::error::{SetupError, SetupResult};
use crate::processor::BoxedProcessor;

// =============================================================================
// Link-time Plugins (linkme distributed slice)
// =============================================================================

/// A processor contributed by another crate at link time.
#[derive(Clone, Copy)]
pub struct ProcessorPlugin {
    /// Configuration key the processor answers to.
    pub key: &'static str,
    /// Creates the processor instance.
    pub factory: fn() -> BoxedProcessor,
}

impl std::fmt::Debug for ProcessorPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorPlugin")
            .field("key", &self.key)
            .finish()
    }
}

/// Registry of link-time processor plugins.
/// Each `#[register_processor]` item contributes one entry.
#[distributed_slice]
pub static PROCESSOR_PLUGINS: [ProcessorPlugin];

/// Finds the plugin registered under `key`.
///
/// If multiple plugins claim the same key a warning is emitted and the
/// **first** one wins.
fn find_plugin(key: &str) -> Option<&'static ProcessorPlugin> {
    let mut matches = PROCESSOR_PLUGINS.iter().filter(|p| p.key == key);
    let first = matches.next()?;
    let extra = matches.count();
    if extra > 0 {
        warn!(
            key,
            count = extra + 1,
            "Multiple processor plugins registered, using first"
        );
    }
    Some(first)
}

// =============================================================================
// Processor Registry
// =============================================================================

/// Maps configuration keys to processor instances.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    /// Processors registered by the application.
    registered: HashMap<String, BoxedProcessor>,
    /// The fixed built-in set.
    builtins: HashMap<String, BoxedProcessor>,
}

impl ProcessorRegistry {
    /// Creates an empty registry. Link-time plugins are still visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a built-in processor (builder pattern).
    pub fn with_builtin(mut self, key: impl Into<String>, processor: BoxedProcessor) -> Self {
        self.builtins.insert(key.into(), processor);
        self
    }

    /// Registers an application processor (builder pattern).
    ///
    /// Registered processors shadow built-ins and plugins with the same key.
    pub fn register(mut self, key: impl Into<String>, processor: BoxedProcessor) -> Self {
        self.insert(key, processor);
        self
    }

    /// Registers an application processor in place.
    pub fn insert(&mut self, key: impl Into<String>, processor: BoxedProcessor) {
        let key = key.into();
        debug!(key = %key, "Registered event processor");
        self.registered.insert(key, processor);
    }

    /// Returns `true` if `key` resolves to a processor.
    pub fn contains(&self, key: &str) -> bool {
        self.registered.contains_key(key)
            || self.builtins.contains_key(key)
            || find_plugin(key).is_some()
    }

    /// Resolves a configuration key to a processor.
    pub fn resolve(&self, key: &str) -> SetupResult<BoxedProcessor> {
        if let Some(processor) = self.registered.get(key) {
            return Ok(processor.clone());
        }
        if let Some(processor) = self.builtins.get(key) {
            return Ok(processor.clone());
        }
        if let Some(plugin) = find_plugin(key) {
            debug!(key, "Instantiating processor plugin");
            return Ok((plugin.factory)());
        }

        Err(SetupError::unresolved(
            key,
            format!(
                "no processor registered under this key; known keys: [{}]",
                self.keys().join(", ")
            ),
        ))
    }

    /// Returns every resolvable key, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .registered
            .keys()
            .chain(self.builtins.keys())
            .cloned()
            .chain(PROCESSOR_PLUGINS.iter().map(|p| p.key.to_string()))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
