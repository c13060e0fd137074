//! Queue operation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the assignment engine and its callers.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum QueueError {
    /// Credential missing, malformed, or rejected by the identity gateway
    #[error("Unauthenticated: {reason}")]
    Unauthenticated {
        /// Why the credential was rejected
        reason: String,
    },

    /// No record matches the target predicate
    #[error("{what} not found")]
    NotFound {
        /// Human-readable description of the missing record
        what: String,
    },

    /// `take_next` found no customer in the `waiting` state
    #[error("No waiting customer found")]
    NoWaitingCustomer,

    /// `finish` found no customer being helped by the representative
    #[error("No customer currently being helped found for this representative")]
    NoActiveCustomer,

    /// Malformed input
    #[error("Validation error for {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// Description of the problem
        message: String,
    },

    /// The transactional store could not complete the operation
    #[error("Store failure: {message}")]
    Store {
        /// Underlying store error message
        message: String,
    },
}

/// Coarse error category, stable across releases and safe to expose on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthenticated,
    NotFound,
    NoWaitingCustomer,
    NoActiveCustomer,
    ValidationError,
    StoreFailure,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound => "not_found",
            Self::NoWaitingCustomer => "no_waiting_customer",
            Self::NoActiveCustomer => "no_active_customer",
            Self::ValidationError => "validation_error",
            Self::StoreFailure => "store_failure",
        }
    }
}

impl QueueError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store { message: message.into() }
    }

    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated { reason: reason.into() }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NoWaitingCustomer => ErrorKind::NoWaitingCustomer,
            Self::NoActiveCustomer => ErrorKind::NoActiveCustomer,
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::Store { .. } => ErrorKind::StoreFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(QueueError::NoWaitingCustomer.kind(), ErrorKind::NoWaitingCustomer);
        assert_eq!(QueueError::store("boom").kind(), ErrorKind::StoreFailure);
        assert_eq!(QueueError::validation("name", "empty").kind().as_str(), "validation_error");
    }

    #[test]
    fn test_display() {
        let err = QueueError::not_found("Customer 42");
        assert_eq!(err.to_string(), "Customer 42 not found");
    }
}
