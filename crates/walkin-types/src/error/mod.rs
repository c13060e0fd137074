//! Typed error definitions for the walk-in queue.
//!
//! Errors are serializable so the server can hand them to clients verbatim,
//! and matchable so the HTTP layer can pick a status code per variant.

mod config;
mod queue;

pub use config::ConfigError;
pub use queue::{ErrorKind, QueueError};

/// Standard Result type for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;
