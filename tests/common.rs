//! Common test utilities for building rows, datasets and workflows.
use flowcraft::prelude::*;

/// Builds a record from `(column, value)` pairs, keeping their order.
#[allow(dead_code)]
pub fn record(cells: &[(&str, Scalar)]) -> Record {
    cells
        .iter()
        .map(|(column, value)| (column.to_string(), value.clone()))
        .collect()
}

/// Four people; Dee has no `city`.
///
/// | name | age | city  |
/// |------|-----|-------|
/// | Ann  | 34  | Oslo  |
/// | Bob  | 25  | Lima  |
/// | Cy   | 41  | Oslo  |
/// | Dee  | 19  |       |
#[allow(dead_code)]
pub fn people_rows() -> Rows {
    vec![
        record(&[
            ("name", "Ann".into()),
            ("age", 34.0.into()),
            ("city", "Oslo".into()),
        ]),
        record(&[
            ("name", "Bob".into()),
            ("age", 25.0.into()),
            ("city", "Lima".into()),
        ]),
        record(&[
            ("name", "Cy".into()),
            ("age", 41.0.into()),
            ("city", "Oslo".into()),
        ]),
        record(&[("name", "Dee".into()), ("age", 19.0.into())]),
    ]
    .into()
}

#[allow(dead_code)]
pub fn people_columns() -> Vec<String> {
    vec!["name".to_string(), "age".to_string(), "city".to_string()]
}

#[allow(dead_code)]
pub fn people_dataset(node_id: &str) -> SourceDataset {
    SourceDataset {
        node_id: node_id.to_string(),
        file_label: "people.csv".to_string(),
        columns: people_columns(),
        rows: people_rows(),
    }
}

/// `count` rows with `n` counting up from 0.
#[allow(dead_code)]
pub fn numbered_rows(count: i64) -> Vec<Record> {
    (0..count).map(|n| record(&[("n", n.into())])).collect()
}

/// The `name` column of `rows`, for compact assertions.
#[allow(dead_code)]
pub fn names(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .map(|row| row.get("name").map(ToString::to_string).unwrap_or_default())
        .collect()
}

/// A graph `src -> a -> b`, where `a` and `b` have the given kinds.
#[allow(dead_code)]
pub fn chain(a: NodeKind, b: NodeKind) -> WorkflowGraph {
    WorkflowGraph::with_id("wf-1", "chain")
        .add_node(GraphNode::new("src", NodeKind::Source))
        .add_node(GraphNode::new("a", a))
        .add_node(GraphNode::new("b", b))
        .add_edge(GraphEdge::new("e-src-a", "src", "a"))
        .add_edge(GraphEdge::new("e-a-b", "a", "b"))
}

/// Replaces the parameters of `node_id`, keeping its input and last output.
#[allow(dead_code)]
pub fn configure(graph: &WorkflowGraph, node_id: &str, body: OperationBody) -> WorkflowGraph {
    let operation = graph
        .operation(node_id)
        .cloned()
        .expect("node should have an operation");
    let body = match (body, &operation.body) {
        (OperationBody::Sort { params, .. }, OperationBody::Sort { output, .. }) => {
            OperationBody::Sort {
                params,
                output: output.clone(),
            }
        }
        (OperationBody::Slice { params, .. }, OperationBody::Slice { output, .. }) => {
            OperationBody::Slice {
                params,
                output: output.clone(),
            }
        }
        (OperationBody::Filter { params, .. }, OperationBody::Filter { output, .. }) => {
            OperationBody::Filter {
                params,
                output: output.clone(),
            }
        }
        (OperationBody::Group { params, .. }, OperationBody::Group { output, .. }) => {
            OperationBody::Group {
                params,
                output: output.clone(),
            }
        }
        (body, _) => body,
    };
    graph.update_operation_parameters(NodeOperation { body, ..operation })
}

#[allow(dead_code)]
pub fn sort_by(column: &str, order: SortOrder) -> OperationBody {
    OperationBody::Sort {
        params: SortParams {
            column: column.to_string(),
            order,
        },
        output: Rows::empty(),
    }
}

#[allow(dead_code)]
pub fn filter_by(column: &str, mode: FilterMode, value: &str, invert: bool) -> OperationBody {
    OperationBody::Filter {
        params: FilterParams {
            column: column.to_string(),
            value: value.to_string(),
            mode,
            invert,
        },
        output: Rows::empty(),
    }
}

#[allow(dead_code)]
pub fn slice_between(start: &str, end: &str) -> OperationBody {
    OperationBody::Slice {
        params: SliceParams {
            start: start.to_string(),
            end: end.to_string(),
        },
        output: Rows::empty(),
    }
}

#[allow(dead_code)]
pub fn group_by(column: &str) -> OperationBody {
    OperationBody::Group {
        params: GroupParams {
            column: column.to_string(),
        },
        output: GroupedRows::empty(),
    }
}

/// Output rows of a non-group node.
#[allow(dead_code)]
pub fn output_rows(graph: &WorkflowGraph, node_id: &str) -> Rows {
    graph
        .operation(node_id)
        .and_then(NodeOperation::forwarded_output)
        .cloned()
        .expect("node should forward a row set")
}

/// A small workflow document: source -> sort (age desc) -> slice (0..2).
#[allow(dead_code)]
pub const PIPELINE_DOCUMENT_JSON: &str = r#"{
    "name": "oldest two",
    "id": "doc-1",
    "nodes": [
        { "id": "src", "type": "selectorNode", "position": { "x": 0, "y": 0 } },
        { "id": "order", "type": "sortNode", "params": { "key": "age", "order": "dsc" } },
        { "id": "top", "type": "slice", "params": { "start": 0, "end": "2" } }
    ],
    "edges": [
        { "source": "src", "sourceHandle": "output", "target": "order" },
        { "id": "order-top", "source": "order", "target": "top" }
    ]
}"#;
