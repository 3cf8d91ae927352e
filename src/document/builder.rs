use super::definition::{DocumentEdge, DocumentNode, WorkflowDocument};
use crate::error::DocumentError;
use crate::graph::{DEFAULT_SOURCE_PORT, GraphEdge, GraphNode, WorkflowGraph};
use crate::operation::{
    FilterParams, GroupParams, KindRegistry, NodeOperation, OperationBody, SliceParams,
    SortParams,
};
use ahash::AHashSet;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Turns a [`WorkflowDocument`] into a [`WorkflowGraph`] through the regular mutation
/// contract: nodes are added, their parameters applied, then edges are added in document
/// order (each one propagating a single hop, as it would on the canvas).
pub struct WorkflowBuilder {
    document: WorkflowDocument,
    registry: KindRegistry,
}

impl WorkflowBuilder {
    pub fn new(document: WorkflowDocument) -> Self {
        Self {
            document,
            registry: KindRegistry::default(),
        }
    }

    /// Accepts `user_type_name` in documents as the kind behind `builtin_type_name`.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        self.registry = self.registry.with_alias(user_type_name, builtin_type_name);
        self
    }

    pub fn build(self) -> Result<WorkflowGraph, DocumentError> {
        let document = self.document;
        let graph = match &document.id {
            Some(id) => WorkflowGraph::with_id(id.clone(), document.name.clone()),
            None => WorkflowGraph::new(document.name.clone()),
        };

        let mut declared: AHashSet<&str> = AHashSet::new();
        for node in &document.nodes {
            if node.id.is_empty() {
                return Err(DocumentError::Validation(
                    "node ids must not be empty".to_string(),
                ));
            }
            if !declared.insert(&node.id) {
                return Err(DocumentError::DuplicateNode(node.id.clone()));
            }
        }

        let graph = document
            .nodes
            .iter()
            .try_fold(graph, |graph, node| add_document_node(&self.registry, graph, node))?;

        document.edges.iter().try_fold(graph, |graph, edge| {
            for endpoint in [&edge.source, &edge.target] {
                if !declared.contains(endpoint.as_str()) {
                    return Err(DocumentError::UnknownEdgeEndpoint {
                        edge_id: edge_id(edge),
                        missing_node_id: endpoint.clone(),
                    });
                }
            }
            let before = graph.edges().len();
            let next = graph.add_edge(to_graph_edge(edge));
            if next.edges().len() == before {
                warn!(edge_id = %edge_id(edge), "edge was not added to the workflow");
            }
            Ok(next)
        })
    }
}

fn add_document_node(
    registry: &KindRegistry,
    graph: WorkflowGraph,
    node: &DocumentNode,
) -> Result<WorkflowGraph, DocumentError> {
    let kind = registry
        .resolve(&node.node_type)
        .ok_or_else(|| DocumentError::UnknownNodeType {
            node_id: node.id.clone(),
            type_name: node.node_type.clone(),
        })?;
    let position = node.position.unwrap_or_default();
    let graph = graph.add_node(GraphNode::new(node.id.clone(), kind).at(position.x, position.y));
    debug!(node_id = %node.id, %kind, "document node added");

    let Some(params) = &node.params else {
        return Ok(graph);
    };
    let Some(current) = graph.operation(&node.id) else {
        return Ok(graph);
    };
    let configured = with_params(current, params).map_err(|e| DocumentError::InvalidParams {
        node_id: node.id.clone(),
        kind: kind.to_string(),
        message: e.to_string(),
    })?;
    Ok(graph.update_operation_parameters(configured))
}

/// Returns `operation` with its parameters read from `params`. Source nodes have none.
fn with_params(
    operation: &NodeOperation,
    params: &Value,
) -> Result<NodeOperation, serde_json::Error> {
    let body = match &operation.body {
        OperationBody::Source { .. } => return Ok(operation.clone()),
        OperationBody::Sort { output, .. } => OperationBody::Sort {
            params: SortParams::deserialize(params)?,
            output: output.clone(),
        },
        OperationBody::Slice { output, .. } => OperationBody::Slice {
            params: SliceParams::deserialize(&bounds_as_text(params))?,
            output: output.clone(),
        },
        OperationBody::Filter { output, .. } => OperationBody::Filter {
            params: FilterParams::deserialize(params)?,
            output: output.clone(),
        },
        OperationBody::Group { output, .. } => OperationBody::Group {
            params: GroupParams::deserialize(params)?,
            output: output.clone(),
        },
    };
    Ok(NodeOperation {
        body,
        ..operation.clone()
    })
}

/// Slice bounds are stored as typed text, but documents often write them as numbers.
fn bounds_as_text(params: &Value) -> Value {
    let mut params = params.clone();
    if let Value::Object(map) = &mut params {
        for bound in ["start", "end"] {
            if let Some(Value::Number(n)) = map.get(bound) {
                let text = n.to_string();
                map.insert(bound.to_string(), Value::String(text));
            }
        }
    }
    params
}

fn edge_id(edge: &DocumentEdge) -> String {
    edge.id
        .clone()
        .unwrap_or_else(|| format!("e{}-{}", edge.source, edge.target))
}

fn to_graph_edge(edge: &DocumentEdge) -> GraphEdge {
    GraphEdge {
        id: edge_id(edge),
        source_node_id: edge.source.clone(),
        source_port: Some(
            edge.source_port
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE_PORT.to_string()),
        ),
        target_node_id: edge.target.clone(),
        target_port: edge.target_port.clone(),
    }
}
