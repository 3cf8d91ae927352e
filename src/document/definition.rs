use crate::error::DocumentError;
use crate::graph::Position;
use serde::{Deserialize, Serialize};

/// A workflow as it is written down: nodes with their type names and parameters, and the
/// edges between them. This is the target structure for any external format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub nodes: Vec<DocumentNode>,
    #[serde(default)]
    pub edges: Vec<DocumentEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: String,
    #[serde(rename = "type", alias = "kind")]
    pub node_type: String,
    #[serde(default)]
    pub position: Option<Position>,
    /// Kind-specific parameters, for example `{"column": "age", "order": "desc"}`.
    #[serde(default, alias = "data")]
    pub params: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEdge {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    #[serde(default, alias = "sourceHandle")]
    pub source_port: Option<String>,
    pub target: String,
    #[serde(default, alias = "targetHandle")]
    pub target_port: Option<String>,
}

impl WorkflowDocument {
    pub fn from_json(content: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DocumentError::Validation(format!("could not read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }
}
