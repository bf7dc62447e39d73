//! Spark Score Service
//!
//! Bridges an assembled `id -> Spark` map and the external scorer: builds the
//! flat scoring request, sends it through [`ScoringClient`], and maps the
//! nested response back onto local sparks.
//!
//! # Mapping contract
//!
//! The response drives the recursion: children come from the response's own
//! `children` lists, not from the local parent/child index, so the two must
//! agree in shape. For every response node the local spark supplies title,
//! description, timestamps, and reason counts; the response supplies the
//! score. A response id with no local spark is a protocol mismatch
//! ([`ScoringError::UnknownSpark`]) and never falls back.

use crate::models::{Spark, SparkTree};
use crate::scoring::client::{
    ScoreForestRequest, ScoreNode, ScoreReason, ScoreTreeRequest, ScoredNode, ScoringClient,
    ScoringError,
};
use std::collections::HashMap;

/// Scoring gateway over one [`ScoringClient`].
pub struct SparkScoreService {
    client: ScoringClient,
}

impl SparkScoreService {
    pub fn new(client: ScoringClient) -> Self {
        Self { client }
    }

    /// Score the subtree rooted at `root_id` over the assembled map.
    pub async fn score_tree(
        &self,
        root_id: &str,
        sparks: &HashMap<String, Spark>,
    ) -> Result<SparkTree, ScoringError> {
        tracing::debug!(root_id, sparks = sparks.len(), "scoring spark tree");

        let request = ScoreTreeRequest {
            nodes: score_nodes(sparks),
            root_id: root_id.to_string(),
        };
        let response = self.client.score_tree(&request).await?;
        let tree = map_scored_node(sparks, &response)?;

        tracing::info!(root_id, "spark tree scored");
        Ok(tree)
    }

    /// Score several subtrees sharing one assembled map.
    pub async fn score_trees(
        &self,
        root_ids: &[String],
        sparks: &HashMap<String, Spark>,
    ) -> Result<Vec<SparkTree>, ScoringError> {
        tracing::debug!(
            roots = root_ids.len(),
            sparks = sparks.len(),
            "scoring spark trees"
        );

        let request = ScoreForestRequest {
            nodes: score_nodes(sparks),
            root_ids: root_ids.to_vec(),
        };
        let response = self.client.score_trees(&request).await?;
        let trees = response
            .iter()
            .map(|node| map_scored_node(sparks, node))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(roots = trees.len(), "spark trees scored");
        Ok(trees)
    }
}

/// Flatten the assembled map into the scorer's request shape.
fn score_nodes(sparks: &HashMap<String, Spark>) -> HashMap<String, ScoreNode> {
    sparks
        .iter()
        .map(|(id, spark)| {
            let reasons = spark
                .reasons
                .iter()
                .map(|reason| ScoreReason {
                    reason_type: reason.reason_type,
                    votes: reason.votes,
                })
                .collect();
            (
                id.clone(),
                ScoreNode {
                    id: spark.id.clone(),
                    parent_id: spark.parent_id.clone(),
                    reasons,
                    created_at: spark.created_at,
                },
            )
        })
        .collect()
}

/// Recursively attach response scores to local sparks.
fn map_scored_node(
    sparks: &HashMap<String, Spark>,
    node: &ScoredNode,
) -> Result<SparkTree, ScoringError> {
    let spark = sparks.get(&node.id).ok_or_else(|| ScoringError::UnknownSpark {
        id: node.id.clone(),
    })?;

    let children = node
        .children
        .iter()
        .map(|child| map_scored_node(sparks, child))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SparkTree::from_spark(spark, Some(node.score), children))
}

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;
