//! The workflow graph aggregate.
//!
//! A [`WorkflowGraph`] is a value: every mutation in [`mutation`] returns a new graph that
//! replaces only the top-level collection it edits, sharing the rest with the previous value.

use crate::operation::{NodeKind, NodeOperation};
use crate::table::{Rows, TabularValue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod evaluate;
pub mod mutation;
pub mod propagation;

/// Canvas coordinates of a node. Owned by the renderer; the engine only stores them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub position: Position,
    pub workflow_id: String,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Position::default(),
            workflow_id: String::new(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }
}

/// A directed connection from one node's output port to another node's input port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source_node_id: String,
    pub source_port: Option<String>,
    pub target_node_id: String,
    pub target_port: Option<String>,
}

impl GraphEdge {
    pub fn new(
        id: impl Into<String>,
        source_node_id: impl Into<String>,
        target_node_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_node_id: source_node_id.into(),
            source_port: Some(DEFAULT_SOURCE_PORT.to_string()),
            target_node_id: target_node_id.into(),
            target_port: None,
        }
    }

    pub fn connects(&self, source_node_id: &str, target_node_id: &str) -> bool {
        self.source_node_id == source_node_id && self.target_node_id == target_node_id
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source_node_id == node_id || self.target_node_id == node_id
    }
}

/// The output port every node exposes.
pub const DEFAULT_SOURCE_PORT: &str = "output";

/// Data uploaded into a source node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDataset {
    pub node_id: String,
    pub file_label: String,
    pub columns: Vec<String>,
    pub rows: Rows,
}

/// A named workflow: nodes, edges, per-node operations, uploaded data and the last preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    id: String,
    name: String,
    source_datasets: Arc<Vec<SourceDataset>>,
    nodes: Arc<Vec<GraphNode>>,
    edges: Arc<Vec<GraphEdge>>,
    operations: Arc<Vec<NodeOperation>>,
    preview: Option<TabularValue>,
}

impl WorkflowGraph {
    /// Creates an empty workflow with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), name)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source_datasets: Arc::default(),
            nodes: Arc::default(),
            edges: Arc::default(),
            operations: Arc::default(),
            preview: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn operations(&self) -> &[NodeOperation] {
        &self.operations
    }

    pub fn source_datasets(&self) -> &[SourceDataset] {
        &self.source_datasets
    }

    pub fn preview(&self) -> Option<&TabularValue> {
        self.preview.as_ref()
    }

    pub fn node(&self, node_id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn edge(&self, edge_id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    pub fn operation(&self, node_id: &str) -> Option<&NodeOperation> {
        self.operations.iter().find(|op| op.node_id == node_id)
    }

    pub fn source_dataset(&self, node_id: &str) -> Option<&SourceDataset> {
        self.source_datasets.iter().find(|d| d.node_id == node_id)
    }

    /// Edges leaving `node_id`, in insertion order.
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| e.source_node_id == node_id)
    }

    /// Returns a copy with `operation` stored in place of the node's current record.
    fn with_operation(&self, operation: NodeOperation) -> Self {
        let operations = self
            .operations
            .iter()
            .map(|op| {
                if op.node_id == operation.node_id {
                    operation.clone()
                } else {
                    op.clone()
                }
            })
            .collect();
        Self {
            operations: Arc::new(operations),
            ..self.clone()
        }
    }
}
