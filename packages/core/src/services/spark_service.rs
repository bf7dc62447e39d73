//! Spark Service - Core Forest Operations
//!
//! This module provides the main business logic layer for spark operations:
//!
//! - CRUD operations (create, read, update, partial update)
//! - Subtree assembly (level-batched breadth-first materialization)
//! - Two delete strategies (cascade and promote)
//! - Scored tree reads with graceful degradation to unscored views
//! - Scoped title search with pagination
//!
//! # Round-trip shape
//!
//! Subtree assembly and cascade deletion issue O(depth) sequential store
//! queries (one per level / per stack pop), never O(node count); the only
//! full-size operation is the final bulk write. Nothing here fans out across
//! siblings in parallel.

use crate::db::SparkStore;
use crate::models::{
    build_forest, build_tree, project_forest, project_tree, Page, PageRequest, Spark,
    SparkDeleteMode, SparkTree, SparkTreeView,
};
use crate::scoring::SparkScoreService;
use crate::services::error::SparkServiceError;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

/// Which parents a spark search is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentScope {
    /// Match sparks anywhere in the forest.
    Any,
    /// Match forest roots only.
    Root,
    /// Match direct children of one parent.
    Of(String),
}

/// Business logic over a [`SparkStore`] and the scoring gateway.
pub struct SparkService {
    store: Arc<dyn SparkStore>,
    score_service: SparkScoreService,
}

impl SparkService {
    pub fn new(store: Arc<dyn SparkStore>, score_service: SparkScoreService) -> Self {
        Self {
            store,
            score_service,
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &Arc<dyn SparkStore> {
        &self.store
    }

    /// Persist a spark as-is. Used by `ReasonService` to write back a spark
    /// whose embedded reasons were edited.
    pub async fn save_spark(&self, spark: Spark) -> Result<Spark, SparkServiceError> {
        Ok(self.store.save(spark).await?)
    }

    /// Fail with `SparkAlreadyExists` when a spark already carries exactly
    /// this title. Check-then-write: not atomic against concurrent creators.
    async fn check_existing_title(&self, title: &str) -> Result<(), SparkServiceError> {
        if self.store.exists_by_title(title).await? {
            tracing::warn!(title, "spark already exists");
            return Err(SparkServiceError::spark_already_exists(title));
        }
        Ok(())
    }

    //
    // CRUD
    //

    /// Create a new root spark.
    pub async fn create_spark(
        &self,
        title: String,
        description: String,
    ) -> Result<Spark, SparkServiceError> {
        tracing::debug!(%title, "creating new spark");

        self.check_existing_title(&title).await?;

        let saved = self.store.save(Spark::new(title, description)).await?;

        tracing::info!(id = %saved.id, "spark created");
        Ok(saved)
    }

    /// Create a new spark under an existing parent.
    ///
    /// The parent is resolved first, so a missing parent reports `NotFound`
    /// even when the title would also have collided.
    pub async fn create_child_spark(
        &self,
        parent_id: &str,
        title: String,
        description: String,
    ) -> Result<Spark, SparkServiceError> {
        tracing::debug!(parent_id, %title, "creating child spark");

        let parent = self.get_spark(parent_id).await?;

        self.check_existing_title(&title).await?;

        let saved = self
            .store
            .save(Spark::new_child(title, description, parent.id.clone()))
            .await?;

        tracing::info!(id = %saved.id, parent_id = %parent.id, "child spark created");
        Ok(saved)
    }

    /// Get a spark by id, failing with `SparkNotFound` when absent.
    pub async fn get_spark(&self, id: &str) -> Result<Spark, SparkServiceError> {
        tracing::debug!(id, "fetching spark");

        let spark = self
            .store
            .get_spark(id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(id, "spark not found");
                SparkServiceError::spark_not_found(id)
            })?;

        Ok(spark)
    }

    /// Direct children of an existing spark.
    pub async fn get_children(&self, parent_id: &str) -> Result<Vec<Spark>, SparkServiceError> {
        tracing::debug!(parent_id, "fetching children sparks");

        let parent = self.get_spark(parent_id).await?;
        let children = self.store.get_children(&parent.id).await?;

        tracing::info!(parent_id = %parent.id, count = children.len(), "children sparks fetched");
        Ok(children)
    }

    /// Full update of title and description.
    ///
    /// The title uniqueness guard only runs when the title actually changes,
    /// so saving a spark under its own title is not a collision.
    pub async fn update_spark(
        &self,
        id: &str,
        title: String,
        description: String,
    ) -> Result<Spark, SparkServiceError> {
        tracing::debug!(id, "updating spark");

        let mut spark = self.get_spark(id).await?;

        if spark.title != title {
            self.check_existing_title(&title).await?;
        }

        spark.title = title;
        spark.description = description;
        spark.updated_at = Utc::now();

        let saved = self.store.save(spark).await?;

        tracing::info!(id = %saved.id, "spark updated");
        Ok(saved)
    }

    /// Partial update: only provided fields change, and `updated_at` is
    /// refreshed only when something changed.
    pub async fn patch_spark(
        &self,
        id: &str,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Spark, SparkServiceError> {
        tracing::debug!(id, "partially updating spark");

        let mut spark = self.get_spark(id).await?;

        if let Some(title) = &title {
            if spark.title != *title {
                self.check_existing_title(title).await?;
            }
        }

        let mut updated = false;
        if let Some(title) = title {
            spark.title = title;
            updated = true;
        }
        if let Some(description) = description {
            spark.description = description;
            updated = true;
        }
        if updated {
            spark.updated_at = Utc::now();
        }

        let saved = self.store.save(spark).await?;

        tracing::info!(id = %saved.id, "spark partially updated");
        Ok(saved)
    }

    //
    // DELETE STRATEGIES
    //

    /// Delete a spark, cascading or promoting per `mode`.
    ///
    /// The target is resolved first: a missing id fails with `SparkNotFound`
    /// before any mutation.
    pub async fn delete_spark(
        &self,
        id: &str,
        mode: SparkDeleteMode,
    ) -> Result<(), SparkServiceError> {
        tracing::debug!(id, ?mode, "deleting spark");

        let spark = self.get_spark(id).await?;

        match mode {
            SparkDeleteMode::Cascade => self.delete_cascade(&spark.id).await,
            SparkDeleteMode::Promote => self.delete_promote(&spark).await,
        }
    }

    /// Collect the whole subtree with an explicit stack, then remove it in
    /// one bulk delete. The explicit stack bounds traversal to heap memory
    /// rather than call-stack depth.
    async fn delete_cascade(&self, root_id: &str) -> Result<(), SparkServiceError> {
        let mut ids_to_delete = Vec::new();
        let mut stack = vec![root_id.to_string()];

        while let Some(current_id) = stack.pop() {
            let children = self.store.get_children(&current_id).await?;
            ids_to_delete.push(current_id);
            for child in children {
                stack.push(child.id);
            }
        }

        self.store.delete_all_by_id(&ids_to_delete).await?;

        tracing::info!(
            root_id,
            deleted = ids_to_delete.len(),
            "deleted spark subtree in cascade mode"
        );
        Ok(())
    }

    /// Delete only the target; its direct children are reattached to the
    /// target's former parent (possibly becoming roots) in one bulk save.
    /// Grandchildren keep their parents and move up with them.
    async fn delete_promote(&self, spark: &Spark) -> Result<(), SparkServiceError> {
        let now = Utc::now();
        let mut children = self.store.get_children(&spark.id).await?;

        if !children.is_empty() {
            for child in &mut children {
                child.parent_id = spark.parent_id.clone();
                child.updated_at = now;
            }
            let promoted = children.len();
            self.store.save_all(children).await?;
            tracing::debug!(
                id = %spark.id,
                promoted,
                new_parent = ?spark.parent_id,
                "promoted children of deleted spark"
            );
        }

        self.store.delete_by_id(&spark.id).await?;

        tracing::info!(id = %spark.id, "deleted spark in promote mode");
        Ok(())
    }

    //
    // SUBTREE ASSEMBLY & TREE READS
    //

    /// Materialize every spark reachable from the given roots into one map.
    ///
    /// Breadth-first with one batched `get_children_of` query per level. Only
    /// newly-seen ids join the next frontier, so each spark is fetched and
    /// inserted exactly once; the dedup also terminates the walk if the
    /// parent graph is accidentally cyclic.
    async fn assemble_subtrees(
        &self,
        roots: &[Spark],
    ) -> Result<HashMap<String, Spark>, SparkServiceError> {
        let mut spark_map: HashMap<String, Spark> = HashMap::new();
        let mut frontier: Vec<String> = Vec::with_capacity(roots.len());

        for root in roots {
            if spark_map.insert(root.id.clone(), root.clone()).is_none() {
                frontier.push(root.id.clone());
            }
        }

        while !frontier.is_empty() {
            let children = self.store.get_children_of(&frontier).await?;
            if children.is_empty() {
                break;
            }

            let mut next_level = Vec::with_capacity(children.len());
            for child in children {
                if !spark_map.contains_key(&child.id) {
                    next_level.push(child.id.clone());
                    spark_map.insert(child.id.clone(), child);
                }
            }

            frontier = next_level;
        }

        Ok(spark_map)
    }

    /// Fetch the subtree rooted at `root_id` as a scored tree.
    ///
    /// When the scorer is unreachable (or answers with a failure status) the
    /// degradation is logged and the unscored tree is returned instead; the
    /// caller never sees the outage. A malformed scoring response still
    /// propagates.
    pub async fn get_spark_tree(&self, root_id: &str) -> Result<SparkTree, SparkServiceError> {
        tracing::debug!(root_id, "fetching spark subtree");

        let root = self.get_spark(root_id).await?;
        let spark_map = self.assemble_subtrees(std::slice::from_ref(&root)).await?;

        tracing::info!(root_id = %root.id, sparks = spark_map.len(), "spark subtree assembled");

        match self.score_service.score_tree(&root.id, &spark_map).await {
            Ok(tree) => Ok(tree),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(
                    root_id = %root.id,
                    error = %err,
                    "error scoring spark tree, returning unscored tree"
                );
                build_tree(&spark_map, &root.id)
                    .ok_or_else(|| SparkServiceError::spark_not_found(&root.id))
            }
            Err(err) => Err(SparkServiceError::ScoringResponseInvalid(err)),
        }
    }

    /// Fetch one page of subtrees: the roots are the direct children of
    /// `parent_id` (or the forest roots when `None`), ordered by creation
    /// time, and every page subtree is assembled in a single multi-root pass.
    pub async fn get_spark_trees(
        &self,
        parent_id: Option<&str>,
        page: u32,
        size: u32,
    ) -> Result<Page<SparkTree>, SparkServiceError> {
        tracing::debug!(?parent_id, page, size, "fetching paged spark trees");

        let request = PageRequest::new(page, size);
        let root_page = match parent_id {
            Some(parent_id) => self.store.find_by_parent(parent_id, request).await?,
            None => self.store.find_roots(request).await?,
        };

        if root_page.content.is_empty() {
            return Ok(Page::new(Vec::new(), request, root_page.total_elements));
        }

        let spark_map = self.assemble_subtrees(&root_page.content).await?;
        let root_ids: Vec<String> = root_page
            .content
            .iter()
            .map(|spark| spark.id.clone())
            .collect();

        let trees = match self.score_service.score_trees(&root_ids, &spark_map).await {
            Ok(trees) => trees,
            Err(err) if err.is_recoverable() => {
                tracing::warn!(
                    ?parent_id,
                    error = %err,
                    "error scoring spark trees, returning unscored trees"
                );
                build_forest(&spark_map, &root_ids)
            }
            Err(err) => return Err(SparkServiceError::ScoringResponseInvalid(err)),
        };

        Ok(Page::new(trees, request, root_page.total_elements))
    }

    /// Tree read plus bounded projection in one call.
    pub async fn get_spark_tree_view(
        &self,
        root_id: &str,
        max_depth: u32,
        max_children: u32,
    ) -> Result<SparkTreeView, SparkServiceError> {
        let tree = self.get_spark_tree(root_id).await?;
        Ok(project_tree(&tree, max_depth, max_children))
    }

    /// Paged tree read plus bounded projection, sharing one depth pass
    /// across the page.
    pub async fn get_spark_tree_views(
        &self,
        parent_id: Option<&str>,
        page: u32,
        size: u32,
        max_depth: u32,
        max_children: u32,
    ) -> Result<Page<SparkTreeView>, SparkServiceError> {
        let trees = self.get_spark_trees(parent_id, page, size).await?;
        let views = project_forest(&trees.content, max_depth, max_children);
        Ok(Page {
            content: views,
            page: trees.page,
            size: trees.size,
            total_elements: trees.total_elements,
        })
    }

    //
    // SEARCH
    //

    /// Search sparks by optional title substring (case-insensitive) within a
    /// parent scope. Results are ordered by creation time.
    pub async fn search_sparks(
        &self,
        title: Option<&str>,
        scope: &ParentScope,
        page: u32,
        size: u32,
    ) -> Result<Page<Spark>, SparkServiceError> {
        tracing::debug!(?title, ?scope, page, size, "searching sparks");

        let request = PageRequest::new(page, size);
        let by_title = title.is_some_and(|text| !text.is_empty());

        let results = if by_title {
            let text = title.unwrap_or_default();
            match scope {
                ParentScope::Any => self.store.find_by_title_containing(text, request).await?,
                ParentScope::Root => {
                    self.store
                        .find_roots_by_title_containing(text, request)
                        .await?
                }
                ParentScope::Of(parent_id) => {
                    self.store
                        .find_by_parent_and_title_containing(parent_id, text, request)
                        .await?
                }
            }
        } else {
            match scope {
                ParentScope::Any => self.store.find_all(request).await?,
                ParentScope::Root => self.store.find_roots(request).await?,
                ParentScope::Of(parent_id) => self.store.find_by_parent(parent_id, request).await?,
            }
        };

        tracing::info!(
            total = results.total_elements,
            page,
            size,
            "sparks matched search criteria"
        );
        Ok(results)
    }
}

#[cfg(test)]
#[path = "spark_service_test.rs"]
mod spark_service_test;
#[cfg(test)]
#[path = "spark_service_delete_test.rs"]
mod spark_service_delete_test;
#[cfg(test)]
#[path = "spark_service_tree_test.rs"]
mod spark_service_tree_test;
