//! Store traits for customers and representatives.
//!
//! The two record stores are split by entity, and the two multi-row
//! transitions the engine needs live in [`AssignmentRepository`] so an
//! implementation can run each of them as one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use walkin_types::{Customer, FinishOutcome, RepIdentity, Representative, RepresentativePatch};

pub type RepoResult<T> = Result<T, RepositoryError>;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A customer handed to a representative, together with the representative
/// row as it stands after the assignment committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub customer: Customer,
    pub rep: Representative,
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Queue a new customer as `waiting` with `created_at = now`.
    async fn insert_customer(&self, name: &str) -> RepoResult<Customer>;
    /// All customers: non-helped first, then helped; each part by arrival.
    async fn list_customers(&self) -> RepoResult<Vec<Customer>>;
    async fn get_customer(&self, id: i64) -> RepoResult<Customer>;
    /// Remove a customer in any status. Absence is `NotFound`.
    async fn delete_customer(&self, id: i64) -> RepoResult<()>;
}

#[async_trait]
pub trait RepresentativeRepository: Send + Sync {
    async fn create_representative(
        &self,
        identity: &RepIdentity,
        name: Option<&str>,
    ) -> RepoResult<Representative>;
    async fn get_representative(&self, identity: &RepIdentity) -> RepoResult<Representative>;
    async fn list_representatives(&self) -> RepoResult<Vec<Representative>>;
    /// Apply only the supplied fields, atomically.
    async fn update_representative(
        &self,
        identity: &RepIdentity,
        patch: &RepresentativePatch,
    ) -> RepoResult<Representative>;
    /// Zero counters and mark available. Never touches customers.
    async fn reset_representative(&self, identity: &RepIdentity) -> RepoResult<Representative>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Select the oldest waiting customer and assign it to `identity` in one
    /// isolated step. `Ok(None)` when nobody is waiting; `NotFound` when the
    /// representative does not exist.
    async fn assign_next_waiting(&self, identity: &RepIdentity) -> RepoResult<Option<Assignment>>;

    /// Mark the representative's active customer helped and book the service
    /// on the representative, both or neither. `Ok(None)` when the
    /// representative has no active customer, in which case nothing changes.
    async fn complete_active(
        &self,
        identity: &RepIdentity,
        finished_at: DateTime<Utc>,
    ) -> RepoResult<Option<FinishOutcome>>;
}

/// Everything the engine needs from storage.
pub trait QueueRepository:
    CustomerRepository + RepresentativeRepository + AssignmentRepository
{
}

impl<T> QueueRepository for T where
    T: CustomerRepository + RepresentativeRepository + AssignmentRepository
{
}
