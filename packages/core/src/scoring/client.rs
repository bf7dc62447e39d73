//! HTTP client for the external scoring service.
//!
//! Wraps the scorer's two endpoints (single-root and batch tree scoring)
//! using [`reqwest`]. The client owns the wire types; mapping responses back
//! onto local sparks lives in [`SparkScoreService`](super::SparkScoreService).

use crate::models::ReasonType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Connection settings for the scoring service.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Base HTTP URL, e.g. `http://scorer:8080`.
    pub base_url: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout; a scoring call never outlives this.
    pub timeout: Duration,
}

impl ScoringConfig {
    /// Config with the default 5 second connect/read timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_millis(5000),
            timeout: Duration::from_millis(5000),
        }
    }
}

/// Errors from the scoring integration.
///
/// `Unavailable` and `Status` are recoverable: tree reads degrade to the
/// unscored view when they occur. `UnknownSpark` is a protocol mismatch and
/// always propagates.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    /// The HTTP request itself failed (connect, timeout, TLS, body decode).
    #[error("scoring request failed: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The scorer returned a non-2xx status code.
    #[error("scoring service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The scorer's response references an id absent from the request's
    /// node map.
    #[error("scoring response references unknown spark id '{id}'")]
    UnknownSpark { id: String },
}

impl ScoringError {
    /// Whether a tree read may absorb this error and fall back to the
    /// unscored view.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ScoringError::UnknownSpark { .. })
    }
}

/// One spark as the scorer sees it: hierarchy link, weighted reasons, age.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub reasons: Vec<ScoreReason>,
    pub created_at: DateTime<Utc>,
}

/// Reason payload inside a [`ScoreNode`].
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReason {
    #[serde(rename = "type")]
    pub reason_type: ReasonType,
    pub votes: i32,
}

/// Single-root scoring request: every assembled spark keyed by id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTreeRequest {
    pub nodes: HashMap<String, ScoreNode>,
    pub root_id: String,
}

/// Batch scoring request over several roots sharing one node map.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreForestRequest {
    pub nodes: HashMap<String, ScoreNode>,
    pub root_ids: Vec<String>,
}

/// Response tree node: mirrors the request's parent/child links as nesting.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredNode {
    pub id: String,
    pub score: i32,
    #[serde(default)]
    pub children: Vec<ScoredNode>,
}

/// HTTP client for one scoring service instance.
pub struct ScoringClient {
    client: reqwest::Client,
    base_url: String,
}

impl ScoringClient {
    /// Build a client with the configured timeouts.
    pub fn new(config: &ScoringConfig) -> Result<Self, ScoringError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Score one subtree. `POST /score`.
    pub async fn score_tree(&self, request: &ScoreTreeRequest) -> Result<ScoredNode, ScoringError> {
        let response = self
            .client
            .post(format!("{}/score", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Score several subtrees in one call. `POST /score/batch`.
    pub async fn score_trees(
        &self,
        request: &ScoreForestRequest,
    ) -> Result<Vec<ScoredNode>, ScoringError> {
        let response = self
            .client
            .post(format!("{}/score/batch", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, then decode the JSON
    /// body. Non-2xx statuses surface as [`ScoringError::Status`] with the
    /// body text attached.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ScoringError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ScoringError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
