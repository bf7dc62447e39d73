//! Unit tests for tree building, subtree depth, and bounded projection.

#[cfg(test)]
mod tree_tests {
    use crate::models::{
        build_forest, build_tree, project_tree, subtree_depths, Spark, SparkTree,
    };
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashMap;

    /// Spark fixture with a fixed id and a deterministic creation time so
    /// child ordering is stable across runs.
    fn spark_at(id: &str, parent_id: Option<&str>, offset_secs: i64) -> Spark {
        let mut spark = Spark::new(format!("title-{id}"), format!("description-{id}"));
        spark.id = id.to_string();
        spark.parent_id = parent_id.map(str::to_string);
        spark.created_at =
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(offset_secs);
        spark.updated_at = spark.created_at;
        spark
    }

    fn map_of(sparks: Vec<Spark>) -> HashMap<String, Spark> {
        sparks
            .into_iter()
            .map(|spark| (spark.id.clone(), spark))
            .collect()
    }

    fn find_child<'a>(tree: &'a SparkTree, id: &str) -> &'a SparkTree {
        tree.children
            .iter()
            .find(|child| child.id == id)
            .unwrap_or_else(|| panic!("child {id} not found under {}", tree.id))
    }

    #[test]
    fn build_tree_wires_children_through_parent_links() {
        let sparks = map_of(vec![
            spark_at("a", None, 0),
            spark_at("b", Some("a"), 1),
            spark_at("c", Some("a"), 2),
            spark_at("d", Some("b"), 3),
        ]);

        let tree = build_tree(&sparks, "a").expect("root present");

        assert_eq!(tree.id, "a");
        assert_eq!(tree.children.len(), 2);
        assert_eq!(find_child(&tree, "b").children.len(), 1);
        assert_eq!(find_child(&tree, "b").children[0].id, "d");
        assert!(find_child(&tree, "c").children.is_empty());
    }

    #[test]
    fn build_tree_orders_children_by_creation_time() {
        let sparks = map_of(vec![
            spark_at("root", None, 0),
            spark_at("late", Some("root"), 30),
            spark_at("early", Some("root"), 10),
            spark_at("middle", Some("root"), 20),
        ]);

        let tree = build_tree(&sparks, "root").unwrap();

        let order: Vec<&str> = tree.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["early", "middle", "late"]);
    }

    #[test]
    fn build_tree_is_unscored() {
        let sparks = map_of(vec![spark_at("a", None, 0), spark_at("b", Some("a"), 1)]);

        let tree = build_tree(&sparks, "a").unwrap();

        assert!(tree.score.is_none());
        assert!(tree.children[0].score.is_none());
    }

    #[test]
    fn build_tree_missing_root_is_none() {
        let sparks = map_of(vec![spark_at("a", None, 0)]);
        assert!(build_tree(&sparks, "nope").is_none());
    }

    #[test]
    fn build_forest_skips_missing_roots() {
        let sparks = map_of(vec![spark_at("a", None, 0), spark_at("b", None, 1)]);

        let forest = build_forest(
            &sparks,
            &["a".to_string(), "gone".to_string(), "b".to_string()],
        );

        let ids: Vec<&str> = forest.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn subtree_depth_is_zero_for_leaves_and_recursive_elsewhere() {
        // a -> b -> d, a -> c
        let sparks = map_of(vec![
            spark_at("a", None, 0),
            spark_at("b", Some("a"), 1),
            spark_at("c", Some("a"), 2),
            spark_at("d", Some("b"), 3),
        ]);
        let tree = build_tree(&sparks, "a").unwrap();

        let depths = subtree_depths(std::slice::from_ref(&tree));

        assert_eq!(depths["a"], 2);
        assert_eq!(depths["b"], 1);
        assert_eq!(depths["c"], 0);
        assert_eq!(depths["d"], 0);
    }

    #[test]
    fn projection_bounds_depth_but_keeps_full_metadata() {
        // Chain a -> b -> c projected with one level of depth: b is emitted
        // without its children, yet still reports them.
        let sparks = map_of(vec![
            spark_at("a", None, 0),
            spark_at("b", Some("a"), 1),
            spark_at("c", Some("b"), 2),
        ]);
        let tree = build_tree(&sparks, "a").unwrap();

        let view = project_tree(&tree, 1, 5);

        assert_eq!(view.depth_below, 2);
        assert_eq!(view.children.len(), 1);

        let b = &view.children[0];
        assert_eq!(b.id, "b");
        assert!(b.children.is_empty());
        assert_eq!(b.children_count, 1);
        assert_eq!(b.depth_below, 1);
    }

    #[test]
    fn projection_truncates_children_but_not_children_count() {
        let sparks = map_of(vec![
            spark_at("root", None, 0),
            spark_at("c1", Some("root"), 1),
            spark_at("c2", Some("root"), 2),
            spark_at("c3", Some("root"), 3),
            spark_at("c4", Some("root"), 4),
        ]);
        let tree = build_tree(&sparks, "root").unwrap();

        let view = project_tree(&tree, 3, 2);

        assert_eq!(view.children.len(), 2);
        assert_eq!(view.children_count, 4);
        // In-order prefix, no re-sorting
        assert_eq!(view.children[0].id, "c1");
        assert_eq!(view.children[1].id, "c2");
    }

    #[test]
    fn projection_with_zero_limits_emits_no_children() {
        let sparks = map_of(vec![spark_at("a", None, 0), spark_at("b", Some("a"), 1)]);
        let tree = build_tree(&sparks, "a").unwrap();

        let no_depth = project_tree(&tree, 0, 5);
        assert!(no_depth.children.is_empty());
        assert_eq!(no_depth.children_count, 1);
        assert_eq!(no_depth.depth_below, 1);

        let no_children = project_tree(&tree, 5, 0);
        assert!(no_children.children.is_empty());
        assert_eq!(no_children.children_count, 1);
    }

    #[test]
    fn projection_applies_child_limit_at_every_level() {
        // root with 3 children, each with 3 children of their own
        let mut sparks = vec![spark_at("root", None, 0)];
        for i in 0..3 {
            let child_id = format!("c{i}");
            sparks.push(spark_at(&child_id, Some("root"), 10 + i));
            for j in 0..3 {
                sparks.push(spark_at(
                    &format!("{child_id}-g{j}"),
                    Some(&child_id),
                    20 + i * 3 + j,
                ));
            }
        }
        let tree = build_tree(&map_of(sparks), "root").unwrap();

        let view = project_tree(&tree, 5, 2);

        assert_eq!(view.children.len(), 2);
        for child in &view.children {
            assert_eq!(child.children.len(), 2);
            assert_eq!(child.children_count, 3);
        }
    }

    #[test]
    fn view_serialization_omits_missing_score() {
        let sparks = map_of(vec![spark_at("a", None, 0)]);
        let tree = build_tree(&sparks, "a").unwrap();

        let json = serde_json::to_value(project_tree(&tree, 1, 1)).unwrap();

        assert!(json.get("score").is_none());
        assert_eq!(json["childrenCount"], 0);
        assert_eq!(json["depthBelow"], 0);
    }
}
