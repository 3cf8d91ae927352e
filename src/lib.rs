//! # Flowcraft - Dataflow Workflows over Tabular Data
//!
//! **Flowcraft** models a visual workflow editor's data pipeline: a graph of nodes (source,
//! sort, filter, slice, group) connected by edges, each node holding an operation record
//! with its parameters, its last received input and its last computed output.
//!
//! ## Core Workflow
//!
//! 1.  **Build a graph**: add nodes and edges to a [`WorkflowGraph`](graph::WorkflowGraph),
//!     or describe one as a [`WorkflowDocument`](document::WorkflowDocument) and convert it
//!     with the [`WorkflowBuilder`](document::WorkflowBuilder).
//! 2.  **Upload data**: attach a dataset to a source node. Its rows are pushed one hop, into
//!     the nodes directly connected to it.
//! 3.  **Run nodes**: running a node applies its transform to its input, stores the output
//!     and makes it the workflow preview. Downstream nodes only see the new output once the
//!     connecting edge is propagated again.
//!
//! Every mutation returns a new graph value; the previous one is never modified.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowcraft::prelude::*;
//!
//! let graph = WorkflowGraph::new("people")
//!     .add_node(GraphNode::new("src", NodeKind::Source))
//!     .add_node(GraphNode::new("adults", NodeKind::Filter))
//!     .add_edge(GraphEdge::new("e1", "src", "adults"));
//!
//! let table = JsonTableCodec.parse(r#"[{"name": "Ann", "age": 34}, {"name": "Bo", "age": 12}]"#)?;
//! let graph = graph.upload_source_data(table.into_dataset("src", "people.json"));
//!
//! let filter = graph.operation("adults").cloned().map(|op| NodeOperation {
//!     body: OperationBody::Filter {
//!         params: FilterParams {
//!             column: "age".into(),
//!             value: "18".into(),
//!             mode: FilterMode::GreaterThan,
//!             invert: false,
//!         },
//!         output: Rows::empty(),
//!     },
//!     ..op
//! });
//! let graph = match filter {
//!     Some(op) => graph.update_operation_parameters(op),
//!     None => graph,
//! };
//!
//! let graph = graph.run_operation("adults")?;
//! let preview = graph.preview().and_then(TabularValue::as_rows);
//! assert_eq!(preview.map(RowSet::len), Some(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod graph;
pub mod operation;
pub mod prelude;
pub mod render;
pub mod store;
pub mod table;
pub mod transform;
pub mod workspace;
