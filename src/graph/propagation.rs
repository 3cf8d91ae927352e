//! Single-hop propagation of node output across edges.
//!
//! Propagation copies a source node's output into the directly connected target's `input`
//! and `columns`. It never runs the target and never continues past it: a chain A→B→C
//! needs B to be run and the B→C edge to be propagated again before C sees anything.

use super::{GraphEdge, WorkflowGraph};
use crate::operation::{NodeKind, NodeOperation};
use tracing::debug;

/// Why an edge did not carry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationSkip {
    /// One of the endpoints has no operation record.
    MissingOperation,
    /// Source nodes only receive data from uploads.
    SourceTarget,
    /// Group output is bucketed and is never forwarded.
    GroupSource,
}

/// Decides what the target operation looks like after data crosses an edge.
pub fn propagated_target(
    source_op: Option<&NodeOperation>,
    target_op: Option<&NodeOperation>,
) -> Result<NodeOperation, PropagationSkip> {
    let (Some(source_op), Some(target_op)) = (source_op, target_op) else {
        return Err(PropagationSkip::MissingOperation);
    };
    if target_op.kind() == NodeKind::Source {
        return Err(PropagationSkip::SourceTarget);
    }
    let output = source_op
        .forwarded_output()
        .ok_or(PropagationSkip::GroupSource)?;
    Ok(target_op.with_input(output.clone(), source_op.columns.clone()))
}

impl WorkflowGraph {
    /// Re-propagates across an existing edge. Unknown edge ids leave the graph unchanged.
    pub fn propagate(&self, edge_id: &str) -> Self {
        match self.edge(edge_id) {
            Some(edge) => {
                let edge = edge.clone();
                self.propagate_along(&edge)
            }
            None => self.clone(),
        }
    }

    /// Propagates across every edge leaving `node_id`, one hop each.
    pub fn propagate_from(&self, node_id: &str) -> Self {
        let edges: Vec<GraphEdge> = self.outgoing_edges(node_id).cloned().collect();
        edges
            .iter()
            .fold(self.clone(), |graph, edge| graph.propagate_along(edge))
    }

    pub(crate) fn propagate_along(&self, edge: &GraphEdge) -> Self {
        let source_op = self.operation(&edge.source_node_id);
        let target_op = self.operation(&edge.target_node_id);
        match propagated_target(source_op, target_op) {
            Ok(updated) => {
                debug!(
                    workflow_id = %self.id,
                    edge_id = %edge.id,
                    rows = updated.input.len(),
                    "propagated output to {}",
                    edge.target_node_id
                );
                self.with_operation(updated)
            }
            Err(skip) => {
                debug!(workflow_id = %self.id, edge_id = %edge.id, ?skip, "propagation skipped");
                self.clone()
            }
        }
    }
}
