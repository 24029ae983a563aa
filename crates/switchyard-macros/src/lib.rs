//! Procedural macros for the Switchyard event router.
//!
//! This crate provides:
//!
//! - `#[register_processor("key")]` - Registers an event processor plugin at link time
//!
//! # Processor Plugins
//!
//! A crate can contribute a processor without the application registering it
//! by hand. The processor becomes resolvable under its key as soon as the
//! crate is linked in:
//!
//! ```rust,ignore
//! use switchyard_macros::register_processor;
//!
//! #[register_processor("scheduled")]
//! fn scheduled() -> ScheduledProcessor {
//!     ScheduledProcessor::default()
//! }
//! ```

mod processor;

use proc_macro::TokenStream;

/// Registers a processor factory under a configuration key.
///
/// The decorated function takes no arguments and returns a value
/// implementing `EventProcessor`. It is left unchanged; a
/// `PROCESSOR_PLUGINS` entry pointing at it is appended.
#[proc_macro_attribute]
pub fn register_processor(attr: TokenStream, item: TokenStream) -> TokenStream {
    processor::register_processor(attr, item)
}
