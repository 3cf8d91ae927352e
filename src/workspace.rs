//! The set of workflows a user works with, and the store they are persisted to.
//!
//! All graph mutations are keyed by workflow id. An unknown id turns the call into a
//! no-op, matching the forgiving contract the canvas relies on. Only creating or deleting
//! a workflow saves the snapshot; fine-grained edits do not.

use crate::error::{RunError, StoreError};
use crate::graph::{GraphEdge, GraphNode, Position, SourceDataset, WorkflowGraph};
use crate::operation::NodeOperation;
use crate::store::WorkflowStore;
use crate::table::TabularValue;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Workspace<S: WorkflowStore> {
    store: S,
    workflows: Vec<WorkflowGraph>,
}

impl<S: WorkflowStore> Workspace<S> {
    /// Opens a workspace, hydrating it from the store.
    pub fn open(store: S) -> Result<Self, StoreError> {
        let workflows = store.load_all()?;
        info!(count = workflows.len(), "workspace opened");
        Ok(Self { store, workflows })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn workflows(&self) -> &[WorkflowGraph] {
        &self.workflows
    }

    /// Creates an empty workflow and saves. Returns the generated id.
    ///
    /// If the save fails the workspace is left exactly as it was.
    pub fn create_workflow(&mut self, name: &str) -> Result<String, StoreError> {
        let graph = WorkflowGraph::new(name);
        let id = graph.id().to_string();
        self.insert_workflow(graph)?;
        Ok(id)
    }

    /// Adds an already built workflow (for example one converted from a document) and saves.
    /// A workflow with the same id is replaced.
    pub fn insert_workflow(&mut self, graph: WorkflowGraph) -> Result<(), StoreError> {
        let mut next: Vec<WorkflowGraph> = self
            .workflows
            .iter()
            .filter(|w| w.id() != graph.id())
            .cloned()
            .collect();
        let id = graph.id().to_string();
        next.push(graph);
        self.commit(next)?;
        info!(workflow_id = %id, "workflow created");
        Ok(())
    }

    /// Deletes a workflow and saves. Unknown ids do nothing and do not touch the store.
    pub fn delete_workflow(&mut self, workflow_id: &str) -> Result<(), StoreError> {
        if self.get_graph_by_id(workflow_id).is_none() {
            return Ok(());
        }
        let next = self
            .workflows
            .iter()
            .filter(|w| w.id() != workflow_id)
            .cloned()
            .collect();
        self.commit(next)?;
        info!(workflow_id, "workflow deleted");
        Ok(())
    }

    /// Saves the current snapshot without changing it.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.store.save_all(&self.workflows).inspect_err(|e| {
            warn!(error = %e, "failed to save workflows");
        })
    }

    fn commit(&mut self, next: Vec<WorkflowGraph>) -> Result<(), StoreError> {
        if let Err(e) = self.store.save_all(&next) {
            warn!(error = %e, "failed to save workflows, keeping previous state");
            return Err(e);
        }
        self.workflows = next;
        Ok(())
    }

    /// Replaces the workflow `workflow_id` with `edit` applied to it.
    fn update(&mut self, workflow_id: &str, edit: impl FnOnce(&WorkflowGraph) -> WorkflowGraph) {
        match self.workflows.iter_mut().find(|w| w.id() == workflow_id) {
            Some(graph) => *graph = edit(graph),
            None => debug!(workflow_id, "ignoring mutation of unknown workflow"),
        }
    }

    fn try_update(
        &mut self,
        workflow_id: &str,
        edit: impl FnOnce(&WorkflowGraph) -> Result<WorkflowGraph, RunError>,
    ) -> Result<(), RunError> {
        match self.workflows.iter_mut().find(|w| w.id() == workflow_id) {
            Some(graph) => {
                *graph = edit(graph)?;
                Ok(())
            }
            None => {
                debug!(workflow_id, "ignoring run in unknown workflow");
                Ok(())
            }
        }
    }

    pub fn add_node(&mut self, workflow_id: &str, node: GraphNode) {
        self.update(workflow_id, |g| g.add_node(node));
    }

    pub fn remove_node(&mut self, workflow_id: &str, node_id: &str) {
        self.update(workflow_id, |g| g.remove_node(node_id));
    }

    pub fn add_edge(&mut self, workflow_id: &str, edge: GraphEdge) {
        self.update(workflow_id, |g| g.add_edge(edge));
    }

    pub fn remove_edge(&mut self, workflow_id: &str, edge_id: &str) {
        self.update(workflow_id, |g| g.remove_edge(edge_id));
    }

    pub fn upload_source_data(&mut self, workflow_id: &str, data: SourceDataset) {
        self.update(workflow_id, |g| g.upload_source_data(data));
    }

    pub fn update_operation_parameters(&mut self, workflow_id: &str, operation: NodeOperation) {
        self.update(workflow_id, |g| g.update_operation_parameters(operation));
    }

    pub fn update_node_position(&mut self, workflow_id: &str, node_id: &str, position: Position) {
        self.update(workflow_id, |g| g.update_node_position(node_id, position));
    }

    /// Re-propagates across one edge of a workflow.
    pub fn propagate(&mut self, workflow_id: &str, edge_id: &str) {
        self.update(workflow_id, |g| g.propagate(edge_id));
    }

    pub fn run_operation(&mut self, workflow_id: &str, node_id: &str) -> Result<(), RunError> {
        self.try_update(workflow_id, |g| g.run_operation(node_id))
    }

    /// Runs every node of a workflow in dependency order. See [`WorkflowGraph::evaluate_all`].
    pub fn evaluate_workflow(&mut self, workflow_id: &str) -> Result<(), RunError> {
        self.try_update(workflow_id, WorkflowGraph::evaluate_all)
    }

    pub fn get_graph_by_id(&self, workflow_id: &str) -> Option<&WorkflowGraph> {
        self.workflows.iter().find(|w| w.id() == workflow_id)
    }

    pub fn get_operations_for_graph(&self, workflow_id: &str) -> Option<&[NodeOperation]> {
        self.get_graph_by_id(workflow_id).map(WorkflowGraph::operations)
    }

    pub fn get_source_data_for_node(
        &self,
        workflow_id: &str,
        node_id: &str,
    ) -> Option<&SourceDataset> {
        self.get_graph_by_id(workflow_id)?.source_dataset(node_id)
    }

    pub fn get_preview(&self, workflow_id: &str) -> Option<&TabularValue> {
        self.get_graph_by_id(workflow_id)?.preview()
    }
}
