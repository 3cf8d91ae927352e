use thiserror::Error;

/// A transform was configured with parameters it cannot execute.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("unsupported filter mode '{0}'")]
    UnsupportedFilterMode(String),

    #[error("invalid regular expression '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("non-numeric slice {bound} bound '{value}'")]
    InvalidSliceBound { bound: &'static str, value: String },
}

/// Errors raised when a node operation is explicitly run.
///
/// These are configuration problems that are only detected at run time. A failed run
/// leaves the node's previous `output` and the graph preview untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("Running node '{node_id}' failed: {source}")]
    Transform {
        node_id: String,
        #[source]
        source: TransformError,
    },

    #[error("Workflow '{workflow_id}' contains a cycle through node '{node_id}'")]
    CyclicGraph {
        workflow_id: String,
        node_id: String,
    },
}

/// Errors reported by a persistent workflow store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not access workflow store at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode or decode workflows as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode or decode workflows as binary: {0}")]
    Binary(String),

    #[error("Workflow store is unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while decoding an uploaded dataset.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to parse dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read dataset CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {index} is not an object of column values")]
    InvalidRow { index: usize },

    #[error("Dataset must be an array of rows or an object with 'columns' and 'rows'")]
    InvalidShape,
}

/// Errors raised when exporting a preview.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV export is only available for flat row sets, not grouped data")]
    GroupedCsv,

    #[error("Failed to serialize preview as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write preview as CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while loading the engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read configuration file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors that can occur when converting a workflow document into a `WorkflowGraph`.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to parse workflow document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Node '{node_id}' has an unregistered node type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Node id '{0}' is declared more than once")]
    DuplicateNode(String),

    #[error("Edge '{edge_id}' references node '{missing_node_id}', which is not declared")]
    UnknownEdgeEndpoint {
        edge_id: String,
        missing_node_id: String,
    },

    #[error("Parameters for {kind} node '{node_id}' are invalid: {message}")]
    InvalidParams {
        node_id: String,
        kind: String,
        message: String,
    },

    #[error("Invalid custom data: {0}")]
    Validation(String),
}
