//! Scoring Integration
//!
//! External-service boundary providing per-spark scores for a materialized
//! tree:
//!
//! - [`ScoringClient`] - reqwest-based HTTP client with configured timeouts
//! - [`SparkScoreService`] - request assembly and response-to-tree mapping
//!
//! Transport failures are recoverable (tree reads degrade to the unscored
//! view); a response referencing an unknown spark id is fatal.

mod client;
mod service;

pub use client::{
    ScoreForestRequest, ScoreNode, ScoreReason, ScoreTreeRequest, ScoredNode, ScoringClient,
    ScoringConfig, ScoringError,
};
pub use service::SparkScoreService;
