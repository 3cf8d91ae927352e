//! The mutation contract of a workflow graph.
//!
//! Every operation takes `&self` and returns the next graph. Invalid input (a self-loop, a
//! duplicate edge, an unknown node) yields an unchanged copy rather than an error.

use super::{GraphEdge, GraphNode, Position, SourceDataset, WorkflowGraph};
use crate::error::RunError;
use crate::operation::{NodeKind, NodeOperation, create_default_operation};
use std::sync::Arc;
use tracing::debug;

impl WorkflowGraph {
    /// Adds a node and creates its default operation record.
    pub fn add_node(&self, node: GraphNode) -> Self {
        if self.node(&node.id).is_some() {
            debug!(workflow_id = %self.id, node_id = %node.id, "ignoring duplicate node");
            return self.clone();
        }

        let operation = create_default_operation(node.kind, &node.id);
        let node = GraphNode {
            workflow_id: self.id.clone(),
            ..node
        };
        debug!(workflow_id = %self.id, node_id = %node.id, kind = %node.kind, "node added");

        let mut nodes = self.nodes.as_ref().clone();
        nodes.push(node);
        let mut operations = self.operations.as_ref().clone();
        operations.push(operation);

        Self {
            nodes: Arc::new(nodes),
            operations: Arc::new(operations),
            ..self.clone()
        }
    }

    /// Removes a node together with its operation, every edge touching it, and its dataset.
    pub fn remove_node(&self, node_id: &str) -> Self {
        if self.node(node_id).is_none() {
            debug!(workflow_id = %self.id, node_id, "ignoring removal of unknown node");
            return self.clone();
        }

        let nodes = self.nodes.iter().filter(|n| n.id != node_id).cloned();
        let operations = self
            .operations
            .iter()
            .filter(|op| op.node_id != node_id)
            .cloned();
        let edges = self.edges.iter().filter(|e| !e.touches(node_id)).cloned();
        let source_datasets = self
            .source_datasets
            .iter()
            .filter(|d| d.node_id != node_id)
            .cloned();
        debug!(workflow_id = %self.id, node_id, "node removed");

        Self {
            nodes: Arc::new(nodes.collect()),
            operations: Arc::new(operations.collect()),
            edges: Arc::new(edges.collect()),
            source_datasets: Arc::new(source_datasets.collect()),
            ..self.clone()
        }
    }

    /// Connects two nodes and pushes the source node's output across the new edge.
    ///
    /// Ignored when the edge loops onto its own node, has no source port, names a node that
    /// is not in the graph, reuses an edge id, or duplicates an existing (source, target) pair.
    pub fn add_edge(&self, edge: GraphEdge) -> Self {
        if let Some(reason) = self.edge_rejection(&edge) {
            debug!(workflow_id = %self.id, edge_id = %edge.id, reason, "ignoring edge");
            return self.clone();
        }

        debug!(
            workflow_id = %self.id,
            edge_id = %edge.id,
            source = %edge.source_node_id,
            target = %edge.target_node_id,
            "edge added"
        );
        let mut edges = self.edges.as_ref().clone();
        edges.push(edge.clone());
        let next = Self {
            edges: Arc::new(edges),
            ..self.clone()
        };
        next.propagate_along(&edge)
    }

    fn edge_rejection(&self, edge: &GraphEdge) -> Option<&'static str> {
        if edge.source_node_id == edge.target_node_id {
            return Some("self-loop");
        }
        if edge.source_port.as_deref().is_none_or(str::is_empty) {
            return Some("missing source port");
        }
        if self.node(&edge.source_node_id).is_none() || self.node(&edge.target_node_id).is_none()
        {
            return Some("unknown endpoint");
        }
        if self.edge(&edge.id).is_some() {
            return Some("duplicate edge id");
        }
        if self
            .edges
            .iter()
            .any(|e| e.connects(&edge.source_node_id, &edge.target_node_id))
        {
            return Some("duplicate connection");
        }
        None
    }

    /// Removes an edge. Downstream `input`/`columns` keep the last value pushed across it.
    pub fn remove_edge(&self, edge_id: &str) -> Self {
        if self.edge(edge_id).is_none() {
            return self.clone();
        }
        let edges = self.edges.iter().filter(|e| e.id != edge_id).cloned();
        debug!(workflow_id = %self.id, edge_id, "edge removed");
        Self {
            edges: Arc::new(edges.collect()),
            ..self.clone()
        }
    }

    /// Stores uploaded data for a source node and pushes it along every outgoing edge.
    ///
    /// Ignored when the node is not in the graph or is not a source node.
    pub fn upload_source_data(&self, data: SourceDataset) -> Self {
        match self.node(&data.node_id) {
            Some(node) if node.kind == NodeKind::Source => {}
            _ => {
                debug!(
                    workflow_id = %self.id,
                    node_id = %data.node_id,
                    "ignoring upload for non-source node"
                );
                return self.clone();
            }
        }

        let operation =
            NodeOperation::source(data.node_id.clone(), data.columns.clone(), data.rows.clone());
        debug!(
            workflow_id = %self.id,
            node_id = %data.node_id,
            file = %data.file_label,
            rows = data.rows.len(),
            "source data uploaded"
        );

        let node_id = data.node_id.clone();
        let mut source_datasets = self.source_datasets.as_ref().clone();
        match source_datasets.iter_mut().find(|d| d.node_id == node_id) {
            Some(existing) => *existing = data,
            None => source_datasets.push(data),
        }

        let next = Self {
            source_datasets: Arc::new(source_datasets),
            ..self.with_operation(operation)
        };
        next.propagate_from(&node_id)
    }

    /// Runs a node's transform over its current input and shows the result as the preview.
    ///
    /// Source nodes, nodes with an empty input and unknown nodes are left as they are. On
    /// error nothing changes: the previous output and preview stay in place.
    pub fn run_operation(&self, node_id: &str) -> Result<Self, RunError> {
        let Some(operation) = self.operation(node_id) else {
            return Ok(self.clone());
        };
        let Some(computed) = operation.execute()? else {
            debug!(workflow_id = %self.id, node_id, "nothing to run");
            return Ok(self.clone());
        };

        debug!(workflow_id = %self.id, node_id, kind = %computed.kind(), "operation run");
        let preview = computed.output_value();
        Ok(Self {
            preview: Some(preview),
            ..self.with_operation(computed)
        })
    }

    /// Replaces a node's operation record wholesale. Nothing is re-run or propagated.
    ///
    /// Ignored when the node has no operation, or the new record has a different kind.
    pub fn update_operation_parameters(&self, operation: NodeOperation) -> Self {
        match self.operation(&operation.node_id) {
            Some(current) if current.kind() == operation.kind() => self.with_operation(operation),
            _ => {
                debug!(
                    workflow_id = %self.id,
                    node_id = %operation.node_id,
                    "ignoring operation update"
                );
                self.clone()
            }
        }
    }

    pub fn update_node_position(&self, node_id: &str, position: Position) -> Self {
        if self.node(node_id).is_none() {
            return self.clone();
        }
        let nodes = self
            .nodes
            .iter()
            .map(|n| {
                if n.id == node_id {
                    GraphNode {
                        position,
                        ..n.clone()
                    }
                } else {
                    n.clone()
                }
            })
            .collect();
        Self {
            nodes: Arc::new(nodes),
            ..self.clone()
        }
    }

    /// Returns a copy with a different display name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}
