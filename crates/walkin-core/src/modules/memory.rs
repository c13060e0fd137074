//! In-process queue store.
//!
//! Used when no database URL is configured and by the engine tests. All
//! state sits behind one mutex and every trait method is a single critical
//! section, which gives the same all-or-nothing and isolation guarantees the
//! PostgreSQL store gets from transactions.

use crate::modules::repository::{
    Assignment, AssignmentRepository, CustomerRepository, RepoResult, RepositoryError,
    RepresentativeRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use walkin_types::{
    Customer, CustomerStatus, FinishOutcome, RepIdentity, Representative, RepresentativePatch,
    RepresentativeStatus,
};

#[derive(Debug, Default)]
struct MemoryState {
    customers: BTreeMap<i64, Customer>,
    reps: BTreeMap<i64, Representative>,
    next_customer_id: i64,
    next_rep_id: i64,
}

impl MemoryState {
    fn rep_id_for(&self, identity: &RepIdentity) -> RepoResult<i64> {
        self.reps
            .values()
            .find(|rep| &rep.identity == identity)
            .map(|rep| rep.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Representative {identity}")))
    }

    fn rep_mut(&mut self, identity: &RepIdentity) -> RepoResult<&mut Representative> {
        let id = self.rep_id_for(identity)?;
        self.reps
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Representative {identity}")))
    }

    fn oldest_where(&self, pred: impl Fn(&Customer) -> bool) -> Option<i64> {
        self.customers
            .values()
            .filter(|c| pred(*c))
            .min_by_key(|c| c.queue_key())
            .map(|c| c.id)
    }
}

/// Queue store kept entirely in memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryQueueRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryQueueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a customer with an explicit arrival time.
    pub fn insert_customer_at(&self, name: &str, created_at: DateTime<Utc>) -> Customer {
        let mut state = self.state.lock();
        state.next_customer_id += 1;
        let customer = Customer::waiting(state.next_customer_id, name.to_string(), created_at);
        state.customers.insert(customer.id, customer.clone());
        customer
    }
}

#[async_trait]
impl CustomerRepository for InMemoryQueueRepository {
    async fn insert_customer(&self, name: &str) -> RepoResult<Customer> {
        Ok(self.insert_customer_at(name, Utc::now()))
    }

    async fn list_customers(&self) -> RepoResult<Vec<Customer>> {
        let state = self.state.lock();
        let mut customers: Vec<Customer> = state.customers.values().cloned().collect();
        customers.sort_by_key(Customer::listing_key);
        Ok(customers)
    }

    async fn get_customer(&self, id: i64) -> RepoResult<Customer> {
        self.state
            .lock()
            .customers
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Customer {id}")))
    }

    async fn delete_customer(&self, id: i64) -> RepoResult<()> {
        self.state
            .lock()
            .customers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("Customer {id}")))
    }
}

#[async_trait]
impl RepresentativeRepository for InMemoryQueueRepository {
    async fn create_representative(
        &self,
        identity: &RepIdentity,
        name: Option<&str>,
    ) -> RepoResult<Representative> {
        let mut state = self.state.lock();
        if state.rep_id_for(identity).is_ok() {
            return Err(RepositoryError::AlreadyExists(format!("Representative {identity}")));
        }
        state.next_rep_id += 1;
        let rep = Representative::provisioned(
            state.next_rep_id,
            identity.clone(),
            name.map(str::to_string),
        );
        state.reps.insert(rep.id, rep.clone());
        Ok(rep)
    }

    async fn get_representative(&self, identity: &RepIdentity) -> RepoResult<Representative> {
        let mut state = self.state.lock();
        state.rep_mut(identity).map(|rep| rep.clone())
    }

    async fn list_representatives(&self) -> RepoResult<Vec<Representative>> {
        Ok(self.state.lock().reps.values().cloned().collect())
    }

    async fn update_representative(
        &self,
        identity: &RepIdentity,
        patch: &RepresentativePatch,
    ) -> RepoResult<Representative> {
        let mut state = self.state.lock();
        let rep = state.rep_mut(identity)?;
        rep.apply(patch);
        Ok(rep.clone())
    }

    async fn reset_representative(&self, identity: &RepIdentity) -> RepoResult<Representative> {
        let mut state = self.state.lock();
        let rep = state.rep_mut(identity)?;
        rep.reset();
        Ok(rep.clone())
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryQueueRepository {
    async fn assign_next_waiting(&self, identity: &RepIdentity) -> RepoResult<Option<Assignment>> {
        let mut state = self.state.lock();
        let rep_id = state.rep_id_for(identity)?;

        let Some(customer_id) = state.oldest_where(Customer::is_waiting) else {
            return Ok(None);
        };

        let customer = match state.customers.get_mut(&customer_id) {
            Some(customer) => {
                customer.status = CustomerStatus::BeingHelped;
                customer.rep_id = Some(rep_id);
                customer.clone()
            },
            None => return Ok(None),
        };

        let rep = state.rep_mut(identity)?;
        rep.status = RepresentativeStatus::Busy;
        let rep = rep.clone();

        Ok(Some(Assignment { customer, rep }))
    }

    async fn complete_active(
        &self,
        identity: &RepIdentity,
        finished_at: DateTime<Utc>,
    ) -> RepoResult<Option<FinishOutcome>> {
        let mut state = self.state.lock();
        let rep_id = state.rep_id_for(identity)?;

        let Some(customer_id) = state.oldest_where(|c| c.is_served_by(rep_id)) else {
            return Ok(None);
        };

        let finished_customer = match state.customers.get_mut(&customer_id) {
            Some(customer) => {
                customer.status = CustomerStatus::Helped;
                customer.finished_at = Some(finished_at);
                customer.clone()
            },
            None => return Ok(None),
        };

        let rep = state.rep_mut(identity)?;
        rep.record_finish(finished_at);
        let rep = rep.clone();

        Ok(Some(FinishOutcome { rep, finished_customer }))
    }
}
