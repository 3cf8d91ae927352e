//! Engine configuration, read from TOML.
//!
//! Every section and field is optional; a missing configuration file yields the defaults.

use crate::error::ConfigError;
use crate::store::{FileStore, StoreFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowcraftConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub format: StoreFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Rows shown by the text renderer before the remainder is elided.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("flowcraft-workflows.json")
}

fn default_log_filter() -> String {
    "flowcraft=info".to_string()
}

fn default_max_rows() -> usize {
    20
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            format: StoreFormat::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
        }
    }
}

impl FlowcraftConfig {
    /// Loads the configuration file at `path`, or the defaults if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "configuration file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The file store described by the `[store]` section.
    pub fn open_store(&self) -> FileStore {
        FileStore::new(self.store.path.clone(), self.store.format)
    }
}
