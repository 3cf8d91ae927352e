use super::WorkflowGraph;
use crate::error::RunError;
use ahash::AHashMap;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::info;

impl WorkflowGraph {
    /// Evaluates the whole graph in dependency order.
    ///
    /// Each node is run (when it has input) and then its output is propagated along every
    /// outgoing edge before any node that depends on it is visited. This is a separate
    /// capability on top of the single-hop contract; `add_edge` and `upload_source_data`
    /// still only move data one hop.
    pub fn evaluate_all(&self) -> Result<Self, RunError> {
        let mut dag: DiGraph<&str, ()> = DiGraph::new();
        let mut indices: AHashMap<&str, NodeIndex> = AHashMap::new();
        for node in self.nodes.iter() {
            indices.insert(&node.id, dag.add_node(&node.id));
        }
        for edge in self.edges.iter() {
            if let (Some(&from), Some(&to)) = (
                indices.get(edge.source_node_id.as_str()),
                indices.get(edge.target_node_id.as_str()),
            ) {
                dag.add_edge(from, to, ());
            }
        }

        let order = toposort(&dag, None).map_err(|cycle| RunError::CyclicGraph {
            workflow_id: self.id.clone(),
            node_id: dag[cycle.node_id()].to_string(),
        })?;

        info!(workflow_id = %self.id, nodes = order.len(), "evaluating workflow");
        order.into_iter().try_fold(self.clone(), |graph, index| {
            let node_id = dag[index];
            Ok(graph.run_operation(node_id)?.propagate_from(node_id))
        })
    }
}
