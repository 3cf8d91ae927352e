//! Persistence boundary for workflows.
//!
//! The engine never assumes a storage technology: it hands the whole list of workflows to
//! a [`WorkflowStore`] and asks for it back at startup.

use crate::error::StoreError;
use crate::graph::WorkflowGraph;

mod file;

pub use file::{FileStore, StoreFormat};

pub trait WorkflowStore {
    /// Loads every saved workflow. A store that has never been saved to returns an empty list.
    fn load_all(&self) -> Result<Vec<WorkflowGraph>, StoreError>;

    /// Replaces the saved snapshot with `workflows`.
    fn save_all(&mut self, workflows: &[WorkflowGraph]) -> Result<(), StoreError>;
}

/// Keeps the saved snapshot in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    saved: Vec<WorkflowGraph>,
    save_count: usize,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `workflows`, as if they had been saved earlier.
    pub fn with_workflows(workflows: Vec<WorkflowGraph>) -> Self {
        Self {
            saved: workflows,
            ..Self::default()
        }
    }

    /// Makes every subsequent save fail, to exercise error paths.
    pub fn failing_saves(mut self, fail: bool) -> Self {
        self.fail_saves = fail;
        self
    }

    pub fn saved(&self) -> &[WorkflowGraph] {
        &self.saved
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl WorkflowStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<WorkflowGraph>, StoreError> {
        Ok(self.saved.clone())
    }

    fn save_all(&mut self, workflows: &[WorkflowGraph]) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Unavailable(
                "memory store is configured to reject saves".to_string(),
            ));
        }
        self.saved = workflows.to_vec();
        self.save_count += 1;
        Ok(())
    }
}
