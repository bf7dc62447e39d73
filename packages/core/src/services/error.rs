//! Service Layer Error Types
//!
//! Tagged error taxonomy for all service operations. Domain errors
//! (`SparkNotFound`, `SparkAlreadyExists`, ...) surface verbatim to the
//! boundary layer; recoverable scoring failures never appear here because
//! tree reads absorb them, so the only scoring variant is the fatal
//! response-mapping mismatch.

use crate::scoring::ScoringError;
use thiserror::Error;

/// Spark/Reason service operation errors.
#[derive(Error, Debug)]
pub enum SparkServiceError {
    /// Spark not found by ID
    #[error("Spark not found: {id}")]
    SparkNotFound { id: String },

    /// Title uniqueness violated; nothing was persisted
    #[error("Spark already exists with title '{title}'")]
    SparkAlreadyExists { title: String },

    /// Reason not found by ID within the owning spark
    #[error("Reason not found: {id}")]
    ReasonNotFound { id: String },

    /// Per-spark reason content uniqueness violated (case-insensitive)
    #[error("Reason already exists with content '{content}'")]
    ReasonAlreadyExists { content: String },

    /// The scorer's response referenced an unknown spark id; a protocol
    /// mismatch, always propagated
    #[error("Invalid scoring response: {0}")]
    ScoringResponseInvalid(#[source] ScoringError),

    /// Store operation failed
    #[error("Store operation failed: {0}")]
    StoreFailed(#[from] anyhow::Error),
}

impl SparkServiceError {
    /// Create a spark not found error
    pub fn spark_not_found(id: impl Into<String>) -> Self {
        Self::SparkNotFound { id: id.into() }
    }

    /// Create a spark already exists error
    pub fn spark_already_exists(title: impl Into<String>) -> Self {
        Self::SparkAlreadyExists {
            title: title.into(),
        }
    }

    /// Create a reason not found error
    pub fn reason_not_found(id: impl Into<String>) -> Self {
        Self::ReasonNotFound { id: id.into() }
    }

    /// Create a reason already exists error
    pub fn reason_already_exists(content: impl Into<String>) -> Self {
        Self::ReasonAlreadyExists {
            content: content.into(),
        }
    }
}
