// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod error;
pub mod filter;
pub mod phrase;
pub mod story;
pub mod trigger;

// Surrounding plumbing: feed sources, poll loop, delivery, runtime settings
pub mod feed;
pub mod settings;
pub mod sink;

// ---- Re-exports for stable public API ----
pub use crate::config::{build, load_trigger_config, ActiveTriggerList, TriggerRegistryBuilder};
pub use crate::error::{ConfigError, ConfigErrorKind, TimeParseError};
pub use crate::filter::filter_stories;
pub use crate::story::{PubDate, Story};
pub use crate::trigger::Trigger;
