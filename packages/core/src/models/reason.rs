//! Reason Data Structures
//!
//! A `Reason` is a typed (good/bad) weighted judgment embedded in exactly one
//! `Spark`. Reasons have no standalone persistence: they live inside the
//! owning spark's `reasons` list and are written back together with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Classification of a reason: an argument in favor or against its spark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonType {
    Good,
    Bad,
}

/// Error for unrecognized reason type values.
#[derive(Error, Debug)]
#[error("Unknown reason type: '{0}'. Valid values are: 'good', 'bad'")]
pub struct ParseReasonTypeError(pub String);

impl std::str::FromStr for ReasonType {
    type Err = ParseReasonTypeError;

    /// Parse a reason type case-insensitively (`"good"`, `"BAD"`, ...).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "good" => Ok(ReasonType::Good),
            "bad" => Ok(ReasonType::Bad),
            _ => Err(ParseReasonTypeError(value.to_string())),
        }
    }
}

impl std::fmt::Display for ReasonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasonType::Good => write!(f, "good"),
            ReasonType::Bad => write!(f, "bad"),
        }
    }
}

/// A judgment attached to a spark.
///
/// Content is unique per owning spark (case-insensitive); the service layer
/// enforces this before any write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reason {
    /// Unique identifier (UUID), scoped to the owning spark's lifecycle
    pub id: String,

    /// Whether this reason argues for or against the spark
    #[serde(rename = "type")]
    pub reason_type: ReasonType,

    /// Free-text body of the judgment
    pub content: String,

    /// Vote weight, starts at 1
    pub votes: i32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Reason {
    /// Create a new reason with an auto-generated UUID and a vote weight of 1.
    pub fn new(reason_type: ReasonType, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            reason_type,
            content,
            votes: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
#[path = "reason_test.rs"]
mod reason_test;
