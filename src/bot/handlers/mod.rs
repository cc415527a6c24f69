//! Discord interaction handlers
//!
//! Autocomplete, button presses, and the framework hooks that route errors and
//! raw gateway events.

/// Autocomplete handlers for sound and group names
pub mod autocomplete;
/// Soundboard button presses
pub mod buttons;
/// Command error hook and gateway event handler
pub mod framework;

pub use framework::{event_handler, on_error};
