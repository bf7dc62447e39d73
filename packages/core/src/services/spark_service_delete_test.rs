//! Unit tests for the cascade and promote delete strategies.

#[cfg(test)]
mod delete_tests {
    use crate::db::{MemorySparkStore, SparkStore};
    use crate::models::{Spark, SparkDeleteMode};
    use crate::scoring::{ScoringClient, ScoringConfig, SparkScoreService};
    use crate::services::error::SparkServiceError;
    use crate::services::SparkService;
    use std::sync::Arc;

    fn create_test_service() -> (Arc<SparkService>, Arc<MemorySparkStore>) {
        let store = Arc::new(MemorySparkStore::new());
        let client = ScoringClient::new(&ScoringConfig::new("http://127.0.0.1:9")).unwrap();
        let service = Arc::new(SparkService::new(
            store.clone(),
            SparkScoreService::new(client),
        ));
        (service, store)
    }

    async fn create(service: &SparkService, title: &str, parent_id: Option<&str>) -> Spark {
        match parent_id {
            Some(parent_id) => service
                .create_child_spark(parent_id, title.to_string(), String::new())
                .await
                .unwrap(),
            None => service
                .create_spark(title.to_string(), String::new())
                .await
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn delete_missing_spark_is_not_found_in_both_modes() {
        let (service, store) = create_test_service();

        let err = service
            .delete_spark("missing", SparkDeleteMode::Cascade)
            .await
            .unwrap_err();
        assert!(matches!(err, SparkServiceError::SparkNotFound { .. }));

        let err = service
            .delete_spark("missing", SparkDeleteMode::Promote)
            .await
            .unwrap_err();
        assert!(matches!(err, SparkServiceError::SparkNotFound { .. }));

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn cascade_removes_whole_subtree() {
        let (service, store) = create_test_service();

        // x -> {y, z}, y -> w
        let x = create(&service, "X", None).await;
        let y = create(&service, "Y", Some(&x.id)).await;
        let z = create(&service, "Z", Some(&x.id)).await;
        let w = create(&service, "W", Some(&y.id)).await;

        service
            .delete_spark(&x.id, SparkDeleteMode::Cascade)
            .await
            .unwrap();

        for id in [&x.id, &y.id, &z.id, &w.id] {
            assert!(store.get_spark(id).await.unwrap().is_none());
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn cascade_leaves_the_rest_of_the_forest_alone() {
        let (service, store) = create_test_service();

        let doomed = create(&service, "Doomed", None).await;
        create(&service, "Doomed child", Some(&doomed.id)).await;
        let survivor = create(&service, "Survivor", None).await;
        let survivor_child = create(&service, "Survivor child", Some(&survivor.id)).await;
        let before = store.get_spark(&survivor.id).await.unwrap().unwrap();

        service
            .delete_spark(&doomed.id, SparkDeleteMode::Cascade)
            .await
            .unwrap();

        assert_eq!(store.len().await, 2);
        // Untouched, not merely present
        assert_eq!(store.get_spark(&survivor.id).await.unwrap().unwrap(), before);
        assert!(store.get_spark(&survivor_child.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn cascade_parent_of_target_is_unmodified() {
        let (service, store) = create_test_service();

        let parent = create(&service, "Parent", None).await;
        let target = create(&service, "Target", Some(&parent.id)).await;
        let before = store.get_spark(&parent.id).await.unwrap().unwrap();

        service
            .delete_spark(&target.id, SparkDeleteMode::Cascade)
            .await
            .unwrap();

        assert_eq!(store.get_spark(&parent.id).await.unwrap().unwrap(), before);
        assert!(service.get_children(&parent.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn promote_reattaches_children_to_former_parent() {
        let (service, store) = create_test_service();

        // a -> {b, c}, b -> d
        let a = create(&service, "A", None).await;
        let b = create(&service, "B", Some(&a.id)).await;
        let c = create(&service, "C", Some(&a.id)).await;
        let d = create(&service, "D", Some(&b.id)).await;

        service
            .delete_spark(&b.id, SparkDeleteMode::Promote)
            .await
            .unwrap();

        assert!(store.get_spark(&b.id).await.unwrap().is_none());

        let promoted = store.get_spark(&d.id).await.unwrap().unwrap();
        assert_eq!(promoted.parent_id.as_deref(), Some(a.id.as_str()));
        assert!(promoted.updated_at > d.updated_at);

        let mut children: Vec<String> = service
            .get_children(&a.id)
            .await
            .unwrap()
            .into_iter()
            .map(|spark| spark.id)
            .collect();
        children.sort();
        let mut expected = vec![c.id.clone(), d.id.clone()];
        expected.sort();
        assert_eq!(children, expected);
    }

    #[tokio::test]
    async fn promote_root_makes_children_roots() {
        let (service, store) = create_test_service();

        let root = create(&service, "Root", None).await;
        let child = create(&service, "Child", Some(&root.id)).await;

        service
            .delete_spark(&root.id, SparkDeleteMode::Promote)
            .await
            .unwrap();

        let promoted = store.get_spark(&child.id).await.unwrap().unwrap();
        assert!(promoted.parent_id.is_none());
    }

    #[tokio::test]
    async fn promote_does_not_touch_grandchildren() {
        let (service, store) = create_test_service();

        let a = create(&service, "A", None).await;
        let b = create(&service, "B", Some(&a.id)).await;
        let c = create(&service, "C", Some(&b.id)).await;
        let d = create(&service, "D", Some(&c.id)).await;
        let before_d = store.get_spark(&d.id).await.unwrap().unwrap();

        service
            .delete_spark(&b.id, SparkDeleteMode::Promote)
            .await
            .unwrap();

        // c moved up, d still hangs off c and was not rewritten
        let c_after = store.get_spark(&c.id).await.unwrap().unwrap();
        assert_eq!(c_after.parent_id.as_deref(), Some(a.id.as_str()));
        assert_eq!(store.get_spark(&d.id).await.unwrap().unwrap(), before_d);
    }

    #[tokio::test]
    async fn promote_leaf_just_deletes_it() {
        let (service, store) = create_test_service();

        let root = create(&service, "Root", None).await;
        let leaf = create(&service, "Leaf", Some(&root.id)).await;

        service
            .delete_spark(&leaf.id, SparkDeleteMode::Promote)
            .await
            .unwrap();

        assert!(store.get_spark(&leaf.id).await.unwrap().is_none());
        assert_eq!(store.len().await, 1);
    }
}
