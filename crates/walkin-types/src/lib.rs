//! # Walk-in Types
//!
//! Core types, models, and error definitions for the walk-in service queue.
//!
//! - **`error`** - Typed error hierarchy for queue operations and configuration
//! - **`models`** - Domain models (Customer, Representative, events, config)
//!
//! ## Architecture Role
//!
//! `walkin-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!          walkin-types (this crate)
//!                  │
//!                  ▼
//!             walkin-core
//!                  │
//!                  ▼
//!            walkin-server
//! ```

pub mod error;
pub mod models;

pub use error::{ConfigError, ErrorKind, QueueError, Result};

pub use models::{
    AuthMode, Customer, CustomerStatus, FinishOutcome, QueueEvent, RepIdentity, Representative,
    RepresentativePatch, RepresentativeStatus, StatusParseError, WalkinConfig,
};
