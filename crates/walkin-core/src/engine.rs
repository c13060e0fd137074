//! Queue state machine.
//!
//! ```text
//! Customer:        waiting --take_next--> being_helped --finish--> helped
//! Representative:  available --take_next--> busy --finish--> available
//! ```
//!
//! Every operation is one atomic store call. Events are published only after
//! that call returns successfully, so subscribers never see a transition that
//! was rolled back.

use crate::broadcaster::EventBroadcaster;
use crate::modules::repository::{QueueRepository, RepositoryError};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use walkin_types::{
    Customer, FinishOutcome, QueueError, QueueEvent, RepIdentity, Representative,
    RepresentativePatch, Result,
};

/// Longest accepted customer name, in characters.
pub const MAX_NAME_LEN: usize = 200;

#[derive(Clone)]
pub struct AssignmentEngine {
    repo: Arc<dyn QueueRepository>,
    events: Arc<EventBroadcaster>,
}

fn store_err(op: &'static str, err: RepositoryError) -> QueueError {
    match err {
        RepositoryError::NotFound(what) => QueueError::not_found(what),
        RepositoryError::AlreadyExists(what) => {
            QueueError::validation("identity", format!("{what} already exists"))
        },
        RepositoryError::Database(message) | RepositoryError::Serialization(message) => {
            error!(op, %message, "store failure");
            QueueError::store(message)
        },
    }
}

impl AssignmentEngine {
    pub fn new(repo: Arc<dyn QueueRepository>, events: Arc<EventBroadcaster>) -> Self {
        Self { repo, events }
    }

    pub fn events(&self) -> &Arc<EventBroadcaster> {
        &self.events
    }

    /// Hand the oldest waiting customer to `identity`.
    pub async fn take_next(&self, identity: &RepIdentity) -> Result<Customer> {
        let assignment = self
            .repo
            .assign_next_waiting(identity)
            .await
            .map_err(|e| store_err("take_next", e))?
            .ok_or(QueueError::NoWaitingCustomer)?;

        info!(
            rep = %identity,
            customer_id = assignment.customer.id,
            "customer assigned"
        );
        self.events.publish(QueueEvent::CustomerUpdated(assignment.customer.clone()));
        self.events.publish(QueueEvent::RepUpdated(assignment.rep));
        Ok(assignment.customer)
    }

    /// Complete the representative's active customer and book it.
    pub async fn finish(&self, identity: &RepIdentity) -> Result<FinishOutcome> {
        let outcome = self
            .repo
            .complete_active(identity, Utc::now())
            .await
            .map_err(|e| store_err("finish", e))?
            .ok_or(QueueError::NoActiveCustomer)?;

        info!(
            rep = %identity,
            customer_id = outcome.finished_customer.id,
            total = outcome.rep.total_customers,
            "service finished"
        );
        self.events.publish(QueueEvent::RepUpdated(outcome.rep.clone()));
        self.events.publish(QueueEvent::CustomerUpdated(outcome.finished_customer.clone()));
        Ok(outcome)
    }

    /// Zero the representative's counters. Customers are left as they are,
    /// including one this representative is still serving.
    pub async fn reset(&self, identity: &RepIdentity) -> Result<Representative> {
        let rep = self
            .repo
            .reset_representative(identity)
            .await
            .map_err(|e| store_err("reset", e))?;

        info!(rep = %identity, "representative reset");
        self.events.publish(QueueEvent::RepUpdated(rep.clone()));
        Ok(rep)
    }

    pub async fn update_representative(
        &self,
        identity: &RepIdentity,
        patch: &RepresentativePatch,
    ) -> Result<Representative> {
        if let Some(total) = patch.total_customers {
            if total < 0 {
                return Err(QueueError::validation("total_customers", "must not be negative"));
            }
        }
        // Nothing to write, so nothing to announce.
        if patch.is_empty() {
            return self.get_representative(identity).await;
        }

        let rep = self
            .repo
            .update_representative(identity, patch)
            .await
            .map_err(|e| store_err("update_representative", e))?;

        info!(rep = %identity, status = %rep.status, total = rep.total_customers, "representative updated");
        self.events.publish(QueueEvent::RepUpdated(rep.clone()));
        Ok(rep)
    }

    pub async fn get_representative(&self, identity: &RepIdentity) -> Result<Representative> {
        self.repo
            .get_representative(identity)
            .await
            .map_err(|e| store_err("get_representative", e))
    }

    pub async fn list_representatives(&self) -> Result<Vec<Representative>> {
        self.repo.list_representatives().await.map_err(|e| store_err("list_representatives", e))
    }

    /// Create a representative row for an identity the gateway already knows.
    pub async fn provision_representative(
        &self,
        identity: &RepIdentity,
        name: Option<&str>,
    ) -> Result<Representative> {
        if identity.as_str().trim().is_empty() {
            return Err(QueueError::validation("identity", "must not be empty"));
        }
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        let rep = self
            .repo
            .create_representative(identity, name)
            .await
            .map_err(|e| store_err("provision_representative", e))?;

        info!(rep = %identity, id = rep.id, "representative provisioned");
        self.events.publish(QueueEvent::RepUpdated(rep.clone()));
        Ok(rep)
    }

    pub async fn add_customer(&self, name: &str) -> Result<Customer> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QueueError::validation("name", "must not be empty"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(QueueError::validation(
                "name",
                format!("must be at most {MAX_NAME_LEN} characters"),
            ));
        }

        let customer =
            self.repo.insert_customer(name).await.map_err(|e| store_err("add_customer", e))?;

        info!(customer_id = customer.id, "customer queued");
        self.events.publish(QueueEvent::CustomerUpdated(customer.clone()));
        Ok(customer)
    }

    /// Delete a customer in any status.
    pub async fn remove_customer(&self, id: i64) -> Result<()> {
        self.repo.delete_customer(id).await.map_err(|e| {
            if matches!(e, RepositoryError::NotFound(_)) {
                warn!(customer_id = id, "remove of unknown customer");
            }
            store_err("remove_customer", e)
        })?;

        info!(customer_id = id, "customer removed");
        self.events.publish(QueueEvent::CustomerRemoved { id });
        Ok(())
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.repo.list_customers().await.map_err(|e| store_err("list_customers", e))
    }
}
