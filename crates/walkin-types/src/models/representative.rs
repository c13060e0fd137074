//! Representative model and identity.

use super::RepresentativeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// External credential subject resolved by an identity gateway.
///
/// Stable and unique per representative; the engine never interprets it beyond
/// equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepIdentity(String);

impl RepIdentity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Sales representative serving walk-in customers one at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Representative {
    pub id: i64,
    pub identity: RepIdentity,
    #[serde(default)]
    pub name: Option<String>,
    pub status: RepresentativeStatus,
    /// Completed services since the last reset
    pub total_customers: i32,
    /// When the last service was completed
    pub finished_at: Option<DateTime<Utc>>,
}

impl Representative {
    /// A newly provisioned, idle representative.
    pub fn provisioned(id: i64, identity: RepIdentity, name: Option<String>) -> Self {
        Self {
            id,
            identity,
            name,
            status: RepresentativeStatus::Available,
            total_customers: 0,
            finished_at: None,
        }
    }

    /// Apply the bookkeeping of one completed service.
    pub fn record_finish(&mut self, at: DateTime<Utc>) {
        self.total_customers = self.total_customers.saturating_add(1);
        self.status = RepresentativeStatus::Available;
        self.finished_at = Some(at);
    }

    /// Zero the counters. Deliberately leaves customers alone.
    pub fn reset(&mut self) {
        self.total_customers = 0;
        self.finished_at = None;
        self.status = RepresentativeStatus::Available;
    }

    pub fn apply(&mut self, patch: &RepresentativePatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(total) = patch.total_customers {
            self.total_customers = total;
        }
    }
}

/// Partial self-update sent by a representative; absent fields are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepresentativePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RepresentativeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_customers: Option<i32>,
}

impl RepresentativePatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.total_customers.is_none()
    }
}
