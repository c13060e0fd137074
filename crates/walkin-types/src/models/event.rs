//! Realtime events and composite operation results.

use super::{Customer, Representative};
use serde::{Deserialize, Serialize};

/// Change notification pushed to dashboard subscribers after a committed transition.
///
/// Receivers should treat these as a hint to re-read state: delivery is
/// best-effort and unordered across topics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum QueueEvent {
    #[serde(rename = "customerUpdated")]
    CustomerUpdated(Customer),
    #[serde(rename = "repUpdated")]
    RepUpdated(Representative),
    #[serde(rename = "customerRemoved")]
    CustomerRemoved { id: i64 },
}

impl QueueEvent {
    /// Topic name as seen on the wire.
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::CustomerUpdated(_) => "customerUpdated",
            Self::RepUpdated(_) => "repUpdated",
            Self::CustomerRemoved { .. } => "customerRemoved",
        }
    }
}

/// Result of `finish`: both records as committed together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinishOutcome {
    pub rep: Representative,
    #[serde(rename = "finishedCustomer")]
    pub finished_customer: Customer,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_event_wire_shape() {
        let customer = Customer::waiting(3, "Ada".to_string(), Utc::now());
        let json = serde_json::to_value(QueueEvent::CustomerUpdated(customer)).unwrap();
        assert_eq!(json["event"], "customerUpdated");
        assert_eq!(json["data"]["id"], 3);
        assert_eq!(json["data"]["status"], "waiting");

        let json = serde_json::to_value(QueueEvent::CustomerRemoved { id: 9 }).unwrap();
        assert_eq!(json["event"], "customerRemoved");
        assert_eq!(json["data"]["id"], 9);
    }

    #[test]
    fn test_topic_matches_serde_tag() {
        let rep = Representative::provisioned(1, "uid".into(), None);
        let event = QueueEvent::RepUpdated(rep);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], event.topic());
    }

    #[test]
    fn test_finish_outcome_field_names() {
        let outcome = FinishOutcome {
            rep: Representative::provisioned(1, "uid".into(), None),
            finished_customer: Customer::waiting(2, "Bob".to_string(), Utc::now()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("finishedCustomer").is_some());
        assert!(json.get("rep").is_some());
    }
}
