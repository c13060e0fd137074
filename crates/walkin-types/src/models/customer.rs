//! Customer model.

use super::CustomerStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person waiting in, being served from, or done with the walk-in queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    /// Store-assigned identifier, increasing in insertion order
    pub id: i64,
    /// Display label entered at the front desk
    #[serde(alias = "customer_name")]
    pub name: String,
    pub status: CustomerStatus,
    /// Representative who took this customer; kept after completion for history
    pub rep_id: Option<i64>,
    /// Queue entry time, defines FIFO order
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// A freshly queued customer.
    pub fn waiting(id: i64, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            status: CustomerStatus::Waiting,
            rep_id: None,
            created_at,
            finished_at: None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.status == CustomerStatus::Waiting
    }

    /// Whether this customer is currently being served by representative `rep_id`.
    pub fn is_served_by(&self, rep_id: i64) -> bool {
        self.status == CustomerStatus::BeingHelped && self.rep_id == Some(rep_id)
    }

    /// Queue priority key: earliest arrival first, ties by id.
    pub fn queue_key(&self) -> (DateTime<Utc>, i64) {
        (self.created_at, self.id)
    }

    /// Listing key: every `helped` record after every other one, then arrival order.
    pub fn listing_key(&self) -> (bool, DateTime<Utc>, i64) {
        (self.status == CustomerStatus::Helped, self.created_at, self.id)
    }
}
