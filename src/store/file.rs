use super::WorkflowStore;
use crate::error::StoreError;
use crate::graph::WorkflowGraph;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// On-disk encoding of a [`FileStore`] snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    /// Pretty-printed JSON, readable and diffable.
    #[default]
    Json,
    /// Compact bincode.
    Bincode,
}

/// Saves all workflows as a single snapshot file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    format: StoreFormat,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, format: StoreFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn encode(&self, workflows: &[WorkflowGraph]) -> Result<Vec<u8>, StoreError> {
        match self.format {
            StoreFormat::Json => Ok(serde_json::to_vec_pretty(workflows)?),
            StoreFormat::Bincode => encode_to_vec(workflows, standard())
                .map_err(|e| StoreError::Binary(format!("Serialization failed: {}", e))),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<WorkflowGraph>, StoreError> {
        match self.format {
            StoreFormat::Json => Ok(serde_json::from_slice(bytes)?),
            StoreFormat::Bincode => decode_from_slice(bytes, standard())
                .map(|(workflows, _)| workflows) // bincode 2 returns a tuple (data, bytes_read)
                .map_err(|e| StoreError::Binary(format!("Deserialization failed: {}", e))),
        }
    }
}

impl WorkflowStore for FileStore {
    fn load_all(&self) -> Result<Vec<WorkflowGraph>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no saved workflows yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        let workflows = self.decode(&bytes)?;
        info!(path = %self.path.display(), count = workflows.len(), "loaded workflows");
        Ok(workflows)
    }

    fn save_all(&mut self, workflows: &[WorkflowGraph]) -> Result<(), StoreError> {
        let bytes = self.encode(workflows)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, bytes).map_err(|e| self.io_error(e))?;
        info!(path = %self.path.display(), count = workflows.len(), "saved workflows");
        Ok(())
    }
}
