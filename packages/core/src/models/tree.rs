//! Spark Tree Structures
//!
//! Transient, read-only materializations of a spark subtree. A [`SparkTree`]
//! is built per read request from an assembled `id -> Spark` map (either
//! unscored, or score-annotated by the scoring service) and is never
//! persisted. [`SparkTreeView`] is the depth/children-bounded serializable
//! projection handed to the boundary layer.
//!
//! # Projection contract
//!
//! Bounding never loses structural information: every view node carries its
//! true `children_count` and its full `depth_below` (subtree height computed
//! over the unbounded tree), even when the emitted `children` array is cut
//! short by the depth or per-node child limits.

use crate::models::Spark;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// A spark subtree with derived reason counts and an optional score.
#[derive(Debug, Clone, PartialEq)]
pub struct SparkTree {
    pub id: String,
    pub title: String,
    pub description: String,
    pub parent_id: Option<String>,
    pub good_reasons_count: usize,
    pub bad_reasons_count: usize,
    /// Score assigned by the scoring service; `None` on the unscored path
    pub score: Option<i32>,
    pub children: Vec<SparkTree>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SparkTree {
    /// Build a tree node from a spark, deriving the reason counts.
    pub fn from_spark(spark: &Spark, score: Option<i32>, children: Vec<SparkTree>) -> Self {
        let (good_reasons_count, bad_reasons_count) = spark.reason_counts();
        Self {
            id: spark.id.clone(),
            title: spark.title.clone(),
            description: spark.description.clone(),
            parent_id: spark.parent_id.clone(),
            good_reasons_count,
            bad_reasons_count,
            score,
            children,
            created_at: spark.created_at,
            updated_at: spark.updated_at,
        }
    }

    /// Project this tree into a bounded view.
    ///
    /// `depths` must come from [`subtree_depths`] over the full tree so that
    /// `depth_below` stays exact regardless of the limits. Both limits apply
    /// at every level: children beyond `max_children` are dropped (in-order
    /// prefix, no re-sorting) and recursion stops once `max_depth` levels
    /// have been emitted.
    pub fn to_view(
        &self,
        max_depth: u32,
        max_children: u32,
        depths: &HashMap<String, u32>,
    ) -> SparkTreeView {
        let mut view = SparkTreeView {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            parent_id: self.parent_id.clone(),
            good_reasons_count: self.good_reasons_count,
            bad_reasons_count: self.bad_reasons_count,
            score: self.score,
            depth_below: depths.get(&self.id).copied().unwrap_or(0),
            children_count: self.children.len(),
            children: Vec::new(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        if max_depth == 0 || max_children == 0 || self.children.is_empty() {
            return view;
        }

        let limit = (max_children as usize).min(self.children.len());
        for child in &self.children[..limit] {
            view.children
                .push(child.to_view(max_depth - 1, max_children, depths));
        }

        view
    }
}

/// Depth/children-bounded serializable projection of a [`SparkTree`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SparkTreeView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub parent_id: Option<String>,
    pub good_reasons_count: usize,
    pub bad_reasons_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    /// Height of the full subtree rooted here (0 for a leaf); never truncated
    pub depth_below: u32,
    /// True number of direct children; never truncated
    pub children_count: usize,
    pub children: Vec<SparkTreeView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compute `depth_below` for every node reachable from the given roots.
///
/// One bottom-up pass over the full trees: 0 for a leaf, otherwise
/// `1 + max(child depths)`. Independent of any projection limits.
pub fn subtree_depths(roots: &[SparkTree]) -> HashMap<String, u32> {
    let mut out = HashMap::new();
    for root in roots {
        depth_below(root, &mut out);
    }
    out
}

fn depth_below(node: &SparkTree, out: &mut HashMap<String, u32>) -> u32 {
    let mut best = 0;
    for child in &node.children {
        best = best.max(1 + depth_below(child, out));
    }
    out.insert(node.id.clone(), best);
    best
}

/// Project a single tree, computing its depth map on the fly.
pub fn project_tree(tree: &SparkTree, max_depth: u32, max_children: u32) -> SparkTreeView {
    let depths = subtree_depths(std::slice::from_ref(tree));
    tree.to_view(max_depth, max_children, &depths)
}

/// Project a forest with one shared depth computation.
pub fn project_forest(
    trees: &[SparkTree],
    max_depth: u32,
    max_children: u32,
) -> Vec<SparkTreeView> {
    let depths = subtree_depths(trees);
    trees
        .iter()
        .map(|tree| tree.to_view(max_depth, max_children, &depths))
        .collect()
}

/// Build an unscored tree for one root from an assembled spark map.
///
/// Children are wired through an adjacency list over `parent_id` back
/// references and ordered by `created_at` (ties broken by id) so repeated
/// builds over the same map are deterministic. Returns `None` when the root
/// id is absent from the map.
pub fn build_tree(spark_map: &HashMap<String, Spark>, root_id: &str) -> Option<SparkTree> {
    let adjacency = child_adjacency(spark_map);
    build_node(spark_map, &adjacency, root_id)
}

/// Build unscored trees for several roots over one shared adjacency list.
///
/// Roots missing from the map are skipped, matching the paged multi-root
/// read where a root may have been deleted between the page query and
/// assembly.
pub fn build_forest(spark_map: &HashMap<String, Spark>, root_ids: &[String]) -> Vec<SparkTree> {
    let adjacency = child_adjacency(spark_map);
    root_ids
        .iter()
        .filter_map(|root_id| build_node(spark_map, &adjacency, root_id))
        .collect()
}

fn child_adjacency(spark_map: &HashMap<String, Spark>) -> HashMap<&str, Vec<&Spark>> {
    let mut adjacency: HashMap<&str, Vec<&Spark>> = HashMap::new();
    for spark in spark_map.values() {
        if let Some(parent_id) = spark.parent_id.as_deref() {
            adjacency.entry(parent_id).or_default().push(spark);
        }
    }
    for children in adjacency.values_mut() {
        children.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
    }
    adjacency
}

fn build_node(
    spark_map: &HashMap<String, Spark>,
    adjacency: &HashMap<&str, Vec<&Spark>>,
    id: &str,
) -> Option<SparkTree> {
    let spark = spark_map.get(id)?;
    let children = adjacency
        .get(id)
        .map(|children| {
            children
                .iter()
                .filter_map(|child| build_node(spark_map, adjacency, &child.id))
                .collect()
        })
        .unwrap_or_default();
    Some(SparkTree::from_spark(spark, None, children))
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
