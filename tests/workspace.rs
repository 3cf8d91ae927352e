//! Workspace and store tests
//!
//! Multi-workflow state, the save policy and the file-backed stores.
mod common;
use common::*;
use flowcraft::prelude::*;

#[cfg(test)]
mod workspace_tests {
    use super::*;

    #[test]
    fn test_create_and_delete_save_the_snapshot() {
        let mut workspace = Workspace::open(MemoryStore::new()).expect("memory store opens");

        let id = workspace.create_workflow("first").expect("save succeeds");
        assert!(uuid_like(&id));
        assert_eq!(workspace.store().save_count(), 1);
        assert_eq!(workspace.store().saved().len(), 1);

        workspace.delete_workflow(&id).expect("save succeeds");
        assert!(workspace.workflows().is_empty());
        assert_eq!(workspace.store().save_count(), 2);
        assert!(workspace.store().saved().is_empty());
    }

    #[test]
    fn test_fine_grained_edits_do_not_save() {
        let mut workspace = Workspace::open(MemoryStore::new()).expect("memory store opens");
        let id = workspace.create_workflow("edits").expect("save succeeds");

        workspace.add_node(&id, GraphNode::new("src", NodeKind::Source));
        workspace.add_node(&id, GraphNode::new("f", NodeKind::Filter));
        workspace.add_edge(&id, GraphEdge::new("e1", "src", "f"));
        workspace.upload_source_data(&id, people_dataset("src"));

        assert_eq!(workspace.store().save_count(), 1);
        assert_eq!(
            workspace.get_operations_for_graph(&id).map(<[_]>::len),
            Some(2)
        );
        assert_eq!(
            workspace
                .get_source_data_for_node(&id, "src")
                .map(|d| d.rows.len()),
            Some(4)
        );
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let existing = WorkflowGraph::with_id("keep", "existing");
        let store = MemoryStore::with_workflows(vec![existing]).failing_saves(true);
        let mut workspace = Workspace::open(store).expect("memory store opens");

        let created = workspace.create_workflow("doomed");
        assert!(matches!(created, Err(StoreError::Unavailable(_))));
        assert_eq!(workspace.workflows().len(), 1);

        let deleted = workspace.delete_workflow("keep");
        assert!(deleted.is_err());
        assert!(workspace.get_graph_by_id("keep").is_some());
    }

    #[test]
    fn test_unknown_workflow_ids_are_ignored() {
        let mut workspace = Workspace::open(MemoryStore::new()).expect("memory store opens");
        let id = workspace.create_workflow("only").expect("save succeeds");
        let before = workspace.workflows().to_vec();

        workspace.add_node("nope", GraphNode::new("src", NodeKind::Source));
        workspace.remove_edge("nope", "e1");
        workspace
            .run_operation("nope", "src")
            .expect("unknown workflow is not an error");
        workspace.delete_workflow("nope").expect("unknown workflow is a no-op");

        assert_eq!(workspace.workflows(), &before[..]);
        assert_eq!(workspace.store().save_count(), 1);
        assert!(workspace.get_preview(&id).is_none());
    }

    #[test]
    fn test_run_operation_updates_the_preview() {
        let mut workspace = Workspace::open(MemoryStore::new()).expect("memory store opens");
        let id = workspace.create_workflow("run").expect("save succeeds");
        workspace.add_node(&id, GraphNode::new("src", NodeKind::Source));
        workspace.add_node(&id, GraphNode::new("g", NodeKind::Group));
        workspace.add_edge(&id, GraphEdge::new("e1", "src", "g"));
        workspace.upload_source_data(&id, people_dataset("src"));

        let graph = workspace.get_graph_by_id(&id).expect("workflow exists");
        let grouped = configure(graph, "g", group_by("city"));
        let operation = grouped.operation("g").cloned().expect("operation exists");
        workspace.update_operation_parameters(&id, operation);

        workspace.run_operation(&id, "g").expect("group runs");
        let preview = workspace.get_preview(&id).expect("preview is set");
        assert!(preview.is_grouped());
    }

    fn uuid_like(id: &str) -> bool {
        id.len() == 36 && id.chars().filter(|c| *c == '-').count() == 4
    }
}

#[cfg(test)]
mod file_store_tests {
    use super::*;
    use tempfile::tempdir;

    fn populated_graph() -> WorkflowGraph {
        let graph =
            chain(NodeKind::Sort, NodeKind::Group).upload_source_data(people_dataset("src"));
        let graph = configure(&graph, "a", sort_by("age", SortOrder::Desc));
        let graph = graph.run_operation("a").expect("sort runs");
        let graph = graph.propagate("e-a-b");
        let graph = configure(&graph, "b", group_by("city"));
        graph.run_operation("b").expect("group runs")
    }

    #[test]
    fn test_missing_file_loads_as_empty() {
        let dir = tempdir().expect("temp dir");
        let store = FileStore::new(dir.path().join("absent.json"), StoreFormat::Json);
        assert!(store.load_all().expect("load succeeds").is_empty());
    }

    #[test]
    fn test_json_snapshot_survives_reload() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("workflows.json");
        let graph = populated_graph();

        let mut store = FileStore::new(&path, StoreFormat::Json);
        store.save_all(&[graph.clone()]).expect("save succeeds");

        let loaded = FileStore::new(&path, StoreFormat::Json)
            .load_all()
            .expect("load succeeds");
        assert_eq!(loaded, vec![graph]);
    }

    #[test]
    fn test_bincode_snapshot_survives_reload() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("workflows.bin");
        let graph = populated_graph();

        let mut store = FileStore::new(&path, StoreFormat::Bincode);
        store.save_all(&[graph.clone()]).expect("save succeeds");

        let loaded = store.load_all().expect("load succeeds");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].preview(), graph.preview());
        assert_eq!(loaded[0].operations(), graph.operations());
    }

    #[test]
    fn test_workspace_reopens_from_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("workflows.json");

        let id = {
            let mut workspace =
                Workspace::open(FileStore::new(&path, StoreFormat::Json)).expect("opens");
            workspace.create_workflow("persisted").expect("save succeeds")
        };

        let reopened = Workspace::open(FileStore::new(&path, StoreFormat::Json)).expect("opens");
        assert_eq!(reopened.get_graph_by_id(&id).map(WorkflowGraph::name), Some("persisted"));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("workflows.json");
        std::fs::write(&path, "not json").expect("write succeeds");

        let result = FileStore::new(&path, StoreFormat::Json).load_all();
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
