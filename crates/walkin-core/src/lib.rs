//! # Walk-in Core
//!
//! Assignment and status-transition engine for the walk-in service queue.
//!
//! ```text
//! walkin-core/src/
//! ├── engine.rs        # AssignmentEngine: take_next / finish / reset / add / remove
//! ├── broadcaster.rs   # EventBroadcaster: fan-out of committed transitions
//! ├── identity.rs      # IdentityGateway trait + JWT and static-token adapters
//! └── modules/
//!     ├── repository.rs      # Store traits and RepositoryError
//!     ├── queue_pg*.rs       # PostgreSQL store (row locks, SKIP LOCKED)
//!     ├── memory.rs          # In-process store with the same guarantees
//!     ├── config.rs          # WalkinConfig loading
//!     └── logger.rs          # tracing subscriber setup
//! ```
//!
//! The engine owns no state of its own. Every transition is one atomic call
//! into a [`modules::repository::QueueRepository`]; only after it returns
//! successfully is the change published on the [`broadcaster::EventBroadcaster`].

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod broadcaster;
pub mod engine;
pub mod identity;
pub mod modules;

#[cfg(test)]
mod engine_tests;

pub use broadcaster::{Delivery, EventBroadcaster, Subscription};
pub use engine::AssignmentEngine;
pub use identity::{IdentityError, IdentityGateway, JwtIdentityGateway, StaticTokenGateway};
pub use modules::memory::InMemoryQueueRepository;
pub use modules::queue_pg::PostgresQueueRepository;
pub use modules::repository::{QueueRepository, RepoResult, RepositoryError};
