//! Reason Service - Embedded Judgment Operations
//!
//! Reasons live inside their owning spark, so every mutation here is a
//! read-modify-write over the whole spark document: load the spark, edit the
//! embedded list, save the spark back. There is no partial-document update;
//! concurrent editors of the same spark can overwrite each other (no
//! optimistic-concurrency token is carried).

use crate::models::{Page, PageRequest, Reason, ReasonType, Spark};
use crate::services::error::SparkServiceError;
use crate::services::spark_service::SparkService;
use chrono::Utc;
use std::sync::Arc;

/// Fields of a reason update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ReasonUpdate {
    pub reason_type: Option<ReasonType>,
    pub content: Option<String>,
    pub votes: Option<i32>,
}

/// Reason operations over the owning [`SparkService`].
pub struct ReasonService {
    sparks: Arc<SparkService>,
}

impl ReasonService {
    pub fn new(sparks: Arc<SparkService>) -> Self {
        Self { sparks }
    }

    /// Fail with `ReasonAlreadyExists` when another reason of the spark
    /// already carries this content (case-insensitive). `exclude_id` skips
    /// the reason being updated so keeping its own content is not a
    /// collision.
    fn check_unique_content(
        spark: &Spark,
        content: &str,
        exclude_id: Option<&str>,
    ) -> Result<(), SparkServiceError> {
        let exists = spark.reasons.iter().any(|reason| {
            exclude_id != Some(reason.id.as_str()) && reason.content.eq_ignore_ascii_case(content)
        });
        if exists {
            tracing::warn!(spark_id = %spark.id, content, "reason content already exists");
            return Err(SparkServiceError::reason_already_exists(content));
        }
        Ok(())
    }

    fn find_reason<'a>(
        spark: &'a mut Spark,
        reason_id: &str,
    ) -> Result<&'a mut Reason, SparkServiceError> {
        spark
            .reasons
            .iter_mut()
            .find(|reason| reason.id == reason_id)
            .ok_or_else(|| {
                tracing::warn!(reason_id, "reason not found");
                SparkServiceError::reason_not_found(reason_id)
            })
    }

    /// Append a new reason to the spark.
    pub async fn add_reason(
        &self,
        spark_id: &str,
        reason_type: ReasonType,
        content: String,
    ) -> Result<Reason, SparkServiceError> {
        tracing::debug!(spark_id, "creating reason");

        let mut spark = self.sparks.get_spark(spark_id).await?;

        Self::check_unique_content(&spark, &content, None)?;

        let reason = Reason::new(reason_type, content);
        spark.reasons.push(reason.clone());
        self.sparks.save_spark(spark).await?;

        tracing::info!(reason_id = %reason.id, spark_id, "reason created");
        Ok(reason)
    }

    /// Get one reason of a spark by id.
    pub async fn get_reason(
        &self,
        spark_id: &str,
        reason_id: &str,
    ) -> Result<Reason, SparkServiceError> {
        tracing::debug!(spark_id, reason_id, "fetching reason");

        let spark = self.sparks.get_spark(spark_id).await?;
        let reason = spark
            .reasons
            .iter()
            .find(|reason| reason.id == reason_id)
            .cloned()
            .ok_or_else(|| {
                tracing::warn!(reason_id, "reason not found");
                SparkServiceError::reason_not_found(reason_id)
            })?;

        Ok(reason)
    }

    /// Page over a spark's reasons, optionally filtered by type.
    ///
    /// The embedded list is small by construction, so filtering and slicing
    /// happen in memory in insertion order.
    pub async fn list_reasons(
        &self,
        spark_id: &str,
        reason_type: Option<ReasonType>,
        page: u32,
        size: u32,
    ) -> Result<Page<Reason>, SparkServiceError> {
        tracing::debug!(spark_id, ?reason_type, "fetching reasons for spark");

        let spark = self.sparks.get_spark(spark_id).await?;
        let filtered: Vec<Reason> = spark
            .reasons
            .into_iter()
            .filter(|reason| reason_type.is_none_or(|wanted| reason.reason_type == wanted))
            .collect();

        let result = Page::from_vec(filtered, PageRequest::new(page, size));

        tracing::info!(spark_id, total = result.total_elements, "reasons fetched");
        Ok(result)
    }

    /// Update a reason's type, content, or vote weight.
    pub async fn update_reason(
        &self,
        spark_id: &str,
        reason_id: &str,
        update: ReasonUpdate,
    ) -> Result<Reason, SparkServiceError> {
        tracing::debug!(spark_id, reason_id, "updating reason");

        let mut spark = self.sparks.get_spark(spark_id).await?;

        if let Some(content) = &update.content {
            Self::check_unique_content(&spark, content, Some(reason_id))?;
        }

        let reason = Self::find_reason(&mut spark, reason_id)?;
        if let Some(reason_type) = update.reason_type {
            reason.reason_type = reason_type;
        }
        if let Some(content) = update.content {
            reason.content = content;
        }
        if let Some(votes) = update.votes {
            reason.votes = votes;
        }
        reason.updated_at = Utc::now();
        let updated = reason.clone();

        self.sparks.save_spark(spark).await?;

        tracing::info!(reason_id, spark_id, "reason updated");
        Ok(updated)
    }

    /// Remove one reason from the spark.
    pub async fn delete_reason(
        &self,
        spark_id: &str,
        reason_id: &str,
    ) -> Result<(), SparkServiceError> {
        tracing::debug!(spark_id, reason_id, "deleting reason");

        let mut spark = self.sparks.get_spark(spark_id).await?;

        let before = spark.reasons.len();
        spark.reasons.retain(|reason| reason.id != reason_id);
        if spark.reasons.len() == before {
            tracing::warn!(reason_id, "reason not found");
            return Err(SparkServiceError::reason_not_found(reason_id));
        }

        self.sparks.save_spark(spark).await?;

        tracing::info!(reason_id, spark_id, "reason deleted");
        Ok(())
    }

    /// Remove every reason from the spark.
    pub async fn clear_reasons(&self, spark_id: &str) -> Result<(), SparkServiceError> {
        tracing::debug!(spark_id, "deleting all reasons for spark");

        let mut spark = self.sparks.get_spark(spark_id).await?;
        spark.reasons.clear();
        self.sparks.save_spark(spark).await?;

        tracing::info!(spark_id, "all reasons deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "reason_service_test.rs"]
mod reason_service_test;
