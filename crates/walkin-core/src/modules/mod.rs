//! Record stores, configuration, and logging.

pub mod config;
pub mod logger;
pub mod memory;
pub mod queue_pg;
pub(crate) mod queue_pg_assign;
pub(crate) mod queue_pg_customers;
pub(crate) mod queue_pg_helpers;
pub(crate) mod queue_pg_reps;
pub mod repository;
