//! Core domain models for the walk-in queue.

mod config;
mod customer;
mod event;
mod representative;
mod status;

pub use config::{AuthConfig, AuthMode, DatabaseConfig, RealtimeConfig, ServerConfig, WalkinConfig};
pub use customer::Customer;
pub use event::{FinishOutcome, QueueEvent};
pub use representative::{RepIdentity, Representative, RepresentativePatch};
pub use status::{CustomerStatus, RepresentativeStatus, StatusParseError};
