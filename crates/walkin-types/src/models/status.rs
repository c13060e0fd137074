//! Closed status sets for customers and representatives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A stored status string that is not part of the closed set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {entity} status: {value:?}")]
pub struct StatusParseError {
    /// Which status set was being parsed
    pub entity: &'static str,
    /// The rejected raw value
    pub value: String,
}

/// Customer lifecycle: `waiting -> being_helped -> helped`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    Waiting,
    #[serde(alias = "being helped")]
    BeingHelped,
    Helped,
}

impl CustomerStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::BeingHelped => "being_helped",
            Self::Helped => "helped",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            // Rows written by the first deployment used a space.
            "being_helped" | "being helped" => Ok(Self::BeingHelped),
            "helped" => Ok(Self::Helped),
            other => Err(StatusParseError { entity: "customer", value: other.to_string() }),
        }
    }
}

/// Representative availability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepresentativeStatus {
    #[default]
    Available,
    Busy,
}

impl RepresentativeStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Busy => "busy",
        }
    }
}

impl fmt::Display for RepresentativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepresentativeStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "busy" => Ok(Self::Busy),
            other => Err(StatusParseError { entity: "representative", value: other.to_string() }),
        }
    }
}
