//! In-Memory Spark Store
//!
//! Reference [`SparkStore`] backend over a `HashMap` guarded by an async
//! `RwLock`. Used as the embedded backend in tests and anywhere a real
//! persistence engine is not wired in; every query shape of the trait is
//! implemented with the same ordering guarantees a database-backed store
//! would provide (`created_at` ascending on paged listings).

use crate::db::SparkStore;
use crate::models::{Page, PageRequest, Spark};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// HashMap-backed spark store.
#[derive(Default)]
pub struct MemorySparkStore {
    sparks: RwLock<HashMap<String, Spark>>,
}

impl MemorySparkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sparks.
    pub async fn len(&self) -> usize {
        self.sparks.read().await.len()
    }

    /// Whether the store holds no sparks.
    pub async fn is_empty(&self) -> bool {
        self.sparks.read().await.is_empty()
    }

    fn page_of(mut matches: Vec<Spark>, page: PageRequest) -> Page<Spark> {
        matches.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Page::from_vec(matches, page)
    }

    fn title_contains(spark: &Spark, needle: &str) -> bool {
        spark
            .title
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

#[async_trait]
impl SparkStore for MemorySparkStore {
    async fn get_spark(&self, id: &str) -> Result<Option<Spark>> {
        Ok(self.sparks.read().await.get(id).cloned())
    }

    async fn exists_by_title(&self, title: &str) -> Result<bool> {
        Ok(self
            .sparks
            .read()
            .await
            .values()
            .any(|spark| spark.title == title))
    }

    async fn get_children(&self, parent_id: &str) -> Result<Vec<Spark>> {
        Ok(self
            .sparks
            .read()
            .await
            .values()
            .filter(|spark| spark.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn get_children_of(&self, parent_ids: &[String]) -> Result<Vec<Spark>> {
        let guard = self.sparks.read().await;
        Ok(guard
            .values()
            .filter(|spark| {
                spark
                    .parent_id
                    .as_ref()
                    .is_some_and(|parent_id| parent_ids.contains(parent_id))
            })
            .cloned()
            .collect())
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Spark>> {
        let matches: Vec<Spark> = self.sparks.read().await.values().cloned().collect();
        Ok(Self::page_of(matches, page))
    }

    async fn find_roots(&self, page: PageRequest) -> Result<Page<Spark>> {
        let matches: Vec<Spark> = self
            .sparks
            .read()
            .await
            .values()
            .filter(|spark| spark.parent_id.is_none())
            .cloned()
            .collect();
        Ok(Self::page_of(matches, page))
    }

    async fn find_by_parent(&self, parent_id: &str, page: PageRequest) -> Result<Page<Spark>> {
        let matches = self.get_children(parent_id).await?;
        Ok(Self::page_of(matches, page))
    }

    async fn find_by_title_containing(
        &self,
        text: &str,
        page: PageRequest,
    ) -> Result<Page<Spark>> {
        let matches: Vec<Spark> = self
            .sparks
            .read()
            .await
            .values()
            .filter(|spark| Self::title_contains(spark, text))
            .cloned()
            .collect();
        Ok(Self::page_of(matches, page))
    }

    async fn find_roots_by_title_containing(
        &self,
        text: &str,
        page: PageRequest,
    ) -> Result<Page<Spark>> {
        let matches: Vec<Spark> = self
            .sparks
            .read()
            .await
            .values()
            .filter(|spark| spark.parent_id.is_none() && Self::title_contains(spark, text))
            .cloned()
            .collect();
        Ok(Self::page_of(matches, page))
    }

    async fn find_by_parent_and_title_containing(
        &self,
        parent_id: &str,
        text: &str,
        page: PageRequest,
    ) -> Result<Page<Spark>> {
        let matches: Vec<Spark> = self
            .sparks
            .read()
            .await
            .values()
            .filter(|spark| {
                spark.parent_id.as_deref() == Some(parent_id) && Self::title_contains(spark, text)
            })
            .cloned()
            .collect();
        Ok(Self::page_of(matches, page))
    }

    async fn save(&self, spark: Spark) -> Result<Spark> {
        self.sparks
            .write()
            .await
            .insert(spark.id.clone(), spark.clone());
        Ok(spark)
    }

    async fn save_all(&self, sparks: Vec<Spark>) -> Result<Vec<Spark>> {
        let mut guard = self.sparks.write().await;
        for spark in &sparks {
            guard.insert(spark.id.clone(), spark.clone());
        }
        Ok(sparks)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.sparks.write().await.remove(id);
        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[String]) -> Result<()> {
        let mut guard = self.sparks.write().await;
        for id in ids {
            guard.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_store_test.rs"]
mod memory_store_test;
