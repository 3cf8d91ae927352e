//! Prelude module for convenient imports
//!
//! Re-exports the types needed to build, mutate, run and persist workflows.
//!
//! ```rust
//! use flowcraft::prelude::*;
//!
//! let mut workspace = Workspace::open(MemoryStore::new())?;
//! let id = workspace.create_workflow("demo")?;
//! workspace.add_node(&id, GraphNode::new("src", NodeKind::Source));
//! assert_eq!(workspace.get_operations_for_graph(&id).map(<[_]>::len), Some(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Graph and mutation contract
pub use crate::graph::{
    DEFAULT_SOURCE_PORT, GraphEdge, GraphNode, Position, SourceDataset, WorkflowGraph,
};
pub use crate::operation::{
    FilterParams, GroupParams, KindRegistry, NodeKind, NodeOperation, OperationBody, SliceParams,
    SortParams, create_default_operation,
};
pub use crate::workspace::Workspace;

// Tabular data
pub use crate::table::{GroupedRows, Record, RowSet, Rows, Scalar, TabularValue};
pub use crate::transform::{FilterMode, SortOrder};

// Documents, codecs and persistence
pub use crate::codec::{
    CsvTableCodec, JsonTableCodec, SourceTable, TableCodec, codec_for_path,
};
pub use crate::config::FlowcraftConfig;
pub use crate::document::{
    DocumentEdge, DocumentNode, IntoWorkflow, WorkflowBuilder, WorkflowDocument,
};
pub use crate::export::{ExportFormat, export_preview};
pub use crate::store::{FileStore, MemoryStore, StoreFormat, WorkflowStore};

// Rendering
pub use crate::render::PreviewFormatter;

// Error types
pub use crate::error::{
    CodecError, ConfigError, DocumentError, ExportError, RunError, StoreError, TransformError,
};
