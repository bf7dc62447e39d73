//! Spark Data Structures
//!
//! This module defines the core `Spark` struct: a forest element with a
//! globally unique title, an optional parent link, and an embedded list of
//! [`Reason`] judgments.
//!
//! # Hierarchy
//!
//! Sparks form a forest: each spark has at most one parent (`parent_id`,
//! `None` means root) and any number of children found by querying the store
//! for sparks whose `parent_id` points back at it. There is no child list on
//! the entity itself.
//!
//! # Examples
//!
//! ```rust
//! use ignitr_core::models::Spark;
//!
//! let root = Spark::new("Learn Rust".to_string(), "Ownership first".to_string());
//! let child = Spark::new_child(
//!     "Read the book".to_string(),
//!     "Chapters 1-4".to_string(),
//!     root.id.clone(),
//! );
//! assert_eq!(child.parent_id.as_deref(), Some(root.id.as_str()));
//! ```

use crate::models::{Reason, ReasonType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A node in the spark forest.
///
/// The spark owns its reasons; they are persisted and deleted together with
/// it. Good/bad reason counts are always derived from the embedded list via
/// [`Spark::reason_counts`], never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spark {
    /// Unique identifier (UUID)
    pub id: String,

    /// Title, globally unique across all sparks (exact match)
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Parent spark ID; `None` means this spark is a forest root
    pub parent_id: Option<String>,

    /// Embedded judgments, in insertion order
    #[serde(default)]
    pub reasons: Vec<Reason>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Spark {
    /// Create a new root spark with an auto-generated UUID.
    pub fn new(title: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            parent_id: None,
            reasons: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new child spark under the given parent.
    pub fn new_child(title: String, description: String, parent_id: String) -> Self {
        let mut spark = Self::new(title, description);
        spark.parent_id = Some(parent_id);
        spark
    }

    /// Count embedded reasons by type: `(good, bad)`.
    pub fn reason_counts(&self) -> (usize, usize) {
        let mut good = 0;
        let mut bad = 0;
        for reason in &self.reasons {
            match reason.reason_type {
                ReasonType::Good => good += 1,
                ReasonType::Bad => bad += 1,
            }
        }
        (good, bad)
    }
}

/// How a spark delete treats the subtree below the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SparkDeleteMode {
    /// Remove the target and every descendant.
    Cascade,
    /// Remove only the target; its direct children are reattached to the
    /// target's former parent (or become roots).
    Promote,
}

/// Error for unrecognized delete mode values.
#[derive(Error, Debug)]
#[error("Unknown spark delete mode: '{0}'. Valid values are: 'cascade', 'promote'")]
pub struct ParseDeleteModeError(pub String);

impl std::str::FromStr for SparkDeleteMode {
    type Err = ParseDeleteModeError;

    /// Parse a delete mode case-insensitively (`"cascade"`, `"PROMOTE"`, ...).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "cascade" => Ok(SparkDeleteMode::Cascade),
            "promote" => Ok(SparkDeleteMode::Promote),
            _ => Err(ParseDeleteModeError(value.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "spark_test.rs"]
mod spark_test;
