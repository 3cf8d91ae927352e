//! Workflow graph tests
//!
//! Mutation contract, single-hop propagation and running operations.
mod common;
use common::*;
use flowcraft::error::{RunError, TransformError};
use flowcraft::prelude::*;

#[cfg(test)]
mod mutation_tests {
    use super::*;

    #[test]
    fn test_add_node_creates_default_operation() {
        let graph =
            WorkflowGraph::with_id("wf", "demo").add_node(GraphNode::new("s", NodeKind::Sort));

        let node = graph.node("s").expect("node should exist");
        assert_eq!(node.workflow_id, "wf");

        let operation = graph.operation("s").expect("operation should exist");
        assert_eq!(operation.kind(), NodeKind::Sort);
        assert!(operation.input.is_empty());
        assert!(operation.columns.is_empty());
        assert_eq!(operation, &create_default_operation(NodeKind::Sort, "s"));
    }

    #[test]
    fn test_duplicate_node_id_is_ignored() {
        let graph = WorkflowGraph::new("demo")
            .add_node(GraphNode::new("n", NodeKind::Filter))
            .add_node(GraphNode::new("n", NodeKind::Group));
        assert_eq!(graph.nodes().len(), 1);
        assert_eq!(graph.operation("n").map(NodeOperation::kind), Some(NodeKind::Filter));
    }

    #[test]
    fn test_rejected_edges_leave_the_graph_unchanged() {
        let graph = chain(NodeKind::Sort, NodeKind::Filter);

        let self_loop = graph.add_edge(GraphEdge::new("loop", "a", "a"));
        assert_eq!(self_loop.edges().len(), 2);

        let duplicate = graph.add_edge(GraphEdge::new("again", "src", "a"));
        assert_eq!(duplicate.edges().len(), 2);

        let dangling = graph.add_edge(GraphEdge::new("ghost", "src", "nowhere"));
        assert_eq!(dangling.edges().len(), 2);

        let no_port = GraphEdge {
            source_port: None,
            ..GraphEdge::new("no-port", "src", "b")
        };
        assert_eq!(graph.add_edge(no_port).edges().len(), 2);
    }

    #[test]
    fn test_cascade_delete() {
        let graph = chain(NodeKind::Sort, NodeKind::Filter)
            .add_node(GraphNode::new("other", NodeKind::Source))
            .add_node(GraphNode::new("side", NodeKind::Slice))
            .add_edge(GraphEdge::new("e-other-side", "other", "side"))
            .upload_source_data(people_dataset("src"))
            .upload_source_data(people_dataset("other"));

        let pruned = graph.remove_node("src");

        assert!(pruned.node("src").is_none());
        assert!(pruned.operation("src").is_none());
        assert!(pruned.source_dataset("src").is_none());
        assert!(pruned.edge("e-src-a").is_none());
        assert!(pruned.edge("e-a-b").is_some());
        assert!(pruned.edge("e-other-side").is_some());
        assert!(pruned.source_dataset("other").is_some());
        assert_eq!(pruned.nodes().len(), 4);
    }

    #[test]
    fn test_remove_edge_keeps_the_last_input() {
        let graph =
            chain(NodeKind::Sort, NodeKind::Filter).upload_source_data(people_dataset("src"));
        let detached = graph.remove_edge("e-src-a");

        assert!(detached.edge("e-src-a").is_none());
        let operation = detached.operation("a").expect("operation should exist");
        assert_eq!(operation.input.len(), 4);
        assert_eq!(operation.columns, people_columns());
    }

    #[test]
    fn test_update_operation_parameters_does_not_run() {
        let graph =
            chain(NodeKind::Sort, NodeKind::Filter).upload_source_data(people_dataset("src"));
        let configured = configure(&graph, "a", sort_by("age", SortOrder::Asc));

        let operation = configured.operation("a").expect("operation should exist");
        assert!(operation.forwarded_output().is_some_and(|rows| rows.is_empty()));
        assert!(configured.preview().is_none());
    }

    #[test]
    fn test_update_with_a_different_kind_is_ignored() {
        let graph = chain(NodeKind::Sort, NodeKind::Filter);
        let changed = configure(&graph, "a", group_by("city"));
        assert_eq!(changed.operation("a").map(NodeOperation::kind), Some(NodeKind::Sort));
    }

    #[test]
    fn test_update_node_position() {
        let graph = chain(NodeKind::Sort, NodeKind::Filter)
            .update_node_position("a", Position { x: 120.0, y: 40.0 });
        assert_eq!(graph.node("a").map(|n| n.position), Some(Position { x: 120.0, y: 40.0 }));
    }

    #[test]
    fn test_upload_is_ignored_for_non_source_nodes() {
        let graph = chain(NodeKind::Sort, NodeKind::Filter);
        let unchanged = graph.upload_source_data(people_dataset("a"));
        assert!(unchanged.source_datasets().is_empty());
        assert_eq!(unchanged, graph);
    }

    #[test]
    fn test_reupload_replaces_the_dataset() {
        let graph =
            chain(NodeKind::Sort, NodeKind::Filter).upload_source_data(people_dataset("src"));
        let smaller = SourceDataset {
            rows: people_rows()[..1].to_vec().into(),
            ..people_dataset("src")
        };
        let graph = graph.upload_source_data(smaller);

        assert_eq!(graph.source_datasets().len(), 1);
        assert_eq!(graph.source_dataset("src").map(|d| d.rows.len()), Some(1));
        assert_eq!(graph.operation("a").map(|op| op.input.len()), Some(1));
    }

    #[test]
    fn test_mutations_do_not_touch_the_previous_graph() {
        let before = chain(NodeKind::Sort, NodeKind::Filter);
        let snapshot = before.clone();

        let after = before
            .upload_source_data(people_dataset("src"))
            .remove_node("b");

        assert_eq!(before, snapshot);
        assert_ne!(after, before);
        assert_eq!(before.nodes().len(), 3);
    }
}

#[cfg(test)]
mod propagation_tests {
    use super::*;

    #[test]
    fn test_upload_moves_data_a_single_hop() {
        let graph =
            chain(NodeKind::Sort, NodeKind::Filter).upload_source_data(people_dataset("src"));

        let a = graph.operation("a").expect("operation should exist");
        assert_eq!(a.input.len(), 4);
        assert_eq!(a.columns, people_columns());

        let b = graph.operation("b").expect("operation should exist");
        assert!(b.input.is_empty());
    }

    #[test]
    fn test_downstream_needs_a_run_and_a_fresh_propagation() {
        let graph =
            chain(NodeKind::Sort, NodeKind::Filter).upload_source_data(people_dataset("src"));
        let graph = configure(&graph, "a", sort_by("age", SortOrder::Desc));

        let ran = graph.run_operation("a").expect("sort should run");
        assert!(ran.operation("b").is_some_and(|op| op.input.is_empty()));

        let pushed = ran.propagate("e-a-b");
        let b = pushed.operation("b").expect("operation should exist");
        assert_eq!(names(&b.input), vec!["Cy", "Ann", "Bob", "Dee"]);
    }

    #[test]
    fn test_adding_an_edge_propagates_existing_output() {
        let graph = WorkflowGraph::new("late edge")
            .add_node(GraphNode::new("src", NodeKind::Source))
            .add_node(GraphNode::new("f", NodeKind::Filter))
            .upload_source_data(people_dataset("src"));
        assert!(graph.operation("f").is_some_and(|op| op.input.is_empty()));

        let connected = graph.add_edge(GraphEdge::new("e1", "src", "f"));
        assert_eq!(connected.operation("f").map(|op| op.input.len()), Some(4));
    }

    #[test]
    fn test_group_output_is_never_forwarded() {
        let graph =
            chain(NodeKind::Group, NodeKind::Sort).upload_source_data(people_dataset("src"));
        let graph = configure(&graph, "a", group_by("city"));
        let graph = graph.run_operation("a").expect("group should run");

        let pushed = graph.propagate("e-a-b").propagate("e-a-b").propagate_from("a");
        assert!(pushed.operation("b").is_some_and(|op| op.input.is_empty()));
    }

    #[test]
    fn test_sources_never_receive_propagated_data() {
        let graph = WorkflowGraph::new("two sources")
            .add_node(GraphNode::new("left", NodeKind::Source))
            .add_node(GraphNode::new("right", NodeKind::Source))
            .add_edge(GraphEdge::new("e1", "left", "right"))
            .upload_source_data(people_dataset("left"));
        assert!(graph.operation("right").is_some_and(|op| op.input.is_empty()));
    }

    #[test]
    fn test_propagated_input_shares_the_upstream_rows() {
        let graph =
            chain(NodeKind::Sort, NodeKind::Filter).upload_source_data(people_dataset("src"));
        let source_rows = output_rows(&graph, "src");
        let input = &graph.operation("a").expect("operation should exist").input;
        assert!(input.ptr_eq(&source_rows));
    }
}

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn test_run_sets_output_and_preview() {
        let graph =
            chain(NodeKind::Filter, NodeKind::Sort).upload_source_data(people_dataset("src"));
        let graph = configure(&graph, "a", filter_by("city", FilterMode::Text, "Oslo", false));
        let graph = graph.run_operation("a").expect("filter should run");

        assert_eq!(names(&output_rows(&graph, "a")), vec!["Ann", "Cy"]);
        let preview = graph.preview().and_then(TabularValue::as_rows).expect("row preview");
        assert_eq!(preview.columns, people_columns());
        assert_eq!(names(&preview.rows), vec!["Ann", "Cy"]);
    }

    #[test]
    fn test_group_run_previews_buckets() {
        let graph =
            chain(NodeKind::Group, NodeKind::Sort).upload_source_data(people_dataset("src"));
        let graph = configure(&graph, "a", group_by("city"));
        let graph = graph.run_operation("a").expect("group should run");

        let groups = graph.preview().and_then(TabularValue::as_grouped).expect("grouped preview");
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["Oslo", "Lima"]);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let graph =
            chain(NodeKind::Slice, NodeKind::Sort).upload_source_data(people_dataset("src"));
        let graph = configure(&graph, "a", slice_between("1", "3"));

        let first = graph.run_operation("a").expect("slice should run");
        let second = first.run_operation("a").expect("slice should run again");

        assert_eq!(output_rows(&first, "a"), output_rows(&second, "a"));
        assert_eq!(first.preview(), second.preview());
        assert_eq!(names(&output_rows(&second, "a")), vec!["Bob", "Cy"]);
    }

    #[test]
    fn test_nothing_to_run_leaves_the_graph_alone() {
        let graph =
            chain(NodeKind::Sort, NodeKind::Filter).upload_source_data(people_dataset("src"));

        let empty_input = graph.run_operation("b").expect("empty input is not an error");
        assert_eq!(empty_input, graph);

        let source = graph.run_operation("src").expect("source run is not an error");
        assert_eq!(source, graph);

        let unknown = graph.run_operation("missing").expect("unknown node is not an error");
        assert_eq!(unknown, graph);
    }

    #[test]
    fn test_failed_run_keeps_previous_output_and_preview() {
        let graph =
            chain(NodeKind::Filter, NodeKind::Sort).upload_source_data(people_dataset("src"));
        let graph = configure(&graph, "a", filter_by("name", FilterMode::Text, "Bob", false));
        let graph = graph.run_operation("a").expect("filter should run");

        let broken = configure(&graph, "a", filter_by("name", FilterMode::Regex, "/[/", false));
        let err = broken.run_operation("a").unwrap_err();

        assert!(matches!(
            err,
            RunError::Transform {
                ref node_id,
                source: TransformError::InvalidRegex { .. },
            } if node_id == "a"
        ));
        assert_eq!(names(&output_rows(&broken, "a")), vec!["Bob"]);
        assert_eq!(broken.preview(), graph.preview());
    }

    #[test]
    fn test_non_numeric_slice_bound_fails_the_run() {
        let graph =
            chain(NodeKind::Slice, NodeKind::Sort).upload_source_data(people_dataset("src"));
        let graph = configure(&graph, "a", slice_between("0", "ten"));

        let err = graph.run_operation("a").unwrap_err();
        assert_eq!(
            err,
            RunError::Transform {
                node_id: "a".to_string(),
                source: TransformError::InvalidSliceBound {
                    bound: "end",
                    value: "ten".to_string(),
                },
            }
        );
    }
}

#[cfg(test)]
mod evaluate_tests {
    use super::*;

    #[test]
    fn test_evaluate_all_runs_the_whole_chain() {
        let graph =
            chain(NodeKind::Sort, NodeKind::Slice).upload_source_data(people_dataset("src"));
        let graph = configure(&graph, "a", sort_by("age", SortOrder::Desc));
        let graph = configure(&graph, "b", slice_between("0", "2"));

        let evaluated = graph.evaluate_all().expect("acyclic graph should evaluate");

        assert_eq!(names(&output_rows(&evaluated, "b")), vec!["Cy", "Ann"]);
        let preview = evaluated.preview().and_then(TabularValue::as_rows).expect("row preview");
        assert_eq!(names(&preview.rows), vec!["Cy", "Ann"]);
    }

    #[test]
    fn test_evaluate_all_rejects_cycles() {
        let graph =
            chain(NodeKind::Sort, NodeKind::Filter).add_edge(GraphEdge::new("back", "b", "a"));
        assert_eq!(graph.edges().len(), 3);

        let err = graph.evaluate_all().unwrap_err();
        assert!(matches!(err, RunError::CyclicGraph { .. }));
    }
}
