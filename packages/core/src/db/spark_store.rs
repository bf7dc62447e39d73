//! SparkStore Trait - Persistence Abstraction Layer
//!
//! This module defines the `SparkStore` trait that abstracts persistence
//! operations for sparks. The trait sits between `SparkService` (business
//! logic) and the storage backend, so the query shapes the services rely on
//! are pinned down here while query execution stays out of the core.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: all methods are async to support both embedded and
//!    network backends
//! 2. **Error Handling**: `anyhow::Result` for flexible error context; the
//!    service layer maps failures into its own error taxonomy
//! 3. **No multi-document transactions**: the backend is assumed to offer
//!    single-call atomicity only (`save_all`, `delete_all_by_id` are each one
//!    bulk operation); callers get no cross-call guarantees
//!
//! # Query ordering
//!
//! Every paged listing returns its page ordered by `created_at` ascending.
//! Unpaged child listings carry no ordering guarantee.

use crate::models::{Page, PageRequest, Spark};
use anyhow::Result;
use async_trait::async_trait;

/// Abstraction layer for spark persistence operations.
///
/// Implementations must be `Send + Sync` so services can hold them behind
/// `Arc<dyn SparkStore>` across await points.
#[async_trait]
pub trait SparkStore: Send + Sync {
    //
    // POINT LOOKUPS
    //

    /// Get a spark by ID.
    ///
    /// Returns `Ok(None)` when the spark does not exist (not an error).
    async fn get_spark(&self, id: &str) -> Result<Option<Spark>>;

    /// Whether any spark carries exactly this title.
    ///
    /// Exact comparison: the title uniqueness guard is case-sensitive, unlike
    /// title search which matches case-insensitive substrings.
    async fn exists_by_title(&self, title: &str) -> Result<bool>;

    //
    // HIERARCHY LISTINGS
    //

    /// All direct children of one parent.
    async fn get_children(&self, parent_id: &str) -> Result<Vec<Spark>>;

    /// All direct children of any of the given parents, in one query.
    ///
    /// This is the per-level batch used by subtree assembly: one call per
    /// tree level instead of one call per node.
    async fn get_children_of(&self, parent_ids: &[String]) -> Result<Vec<Spark>>;

    //
    // PAGED LISTINGS & SEARCH
    //

    /// Page over all sparks.
    async fn find_all(&self, page: PageRequest) -> Result<Page<Spark>>;

    /// Page over forest roots (`parent_id` is null).
    async fn find_roots(&self, page: PageRequest) -> Result<Page<Spark>>;

    /// Page over the direct children of one parent.
    async fn find_by_parent(&self, parent_id: &str, page: PageRequest) -> Result<Page<Spark>>;

    /// Page over sparks whose title contains `text` (case-insensitive).
    async fn find_by_title_containing(&self, text: &str, page: PageRequest)
        -> Result<Page<Spark>>;

    /// Root-scoped variant of [`SparkStore::find_by_title_containing`].
    async fn find_roots_by_title_containing(
        &self,
        text: &str,
        page: PageRequest,
    ) -> Result<Page<Spark>>;

    /// Parent-scoped variant of [`SparkStore::find_by_title_containing`].
    async fn find_by_parent_and_title_containing(
        &self,
        parent_id: &str,
        text: &str,
        page: PageRequest,
    ) -> Result<Page<Spark>>;

    //
    // WRITES
    //

    /// Insert or replace one spark.
    async fn save(&self, spark: Spark) -> Result<Spark>;

    /// Insert or replace several sparks in one bulk write.
    async fn save_all(&self, sparks: Vec<Spark>) -> Result<Vec<Spark>>;

    /// Delete one spark by ID. Deleting an absent ID is a no-op.
    async fn delete_by_id(&self, id: &str) -> Result<()>;

    /// Delete several sparks in one bulk operation.
    async fn delete_all_by_id(&self, ids: &[String]) -> Result<()>;
}
