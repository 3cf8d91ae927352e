use super::definition::WorkflowDocument;
use crate::error::DocumentError;

/// Custom workflow formats convert into a [`WorkflowDocument`], which
/// [`WorkflowBuilder`](super::WorkflowBuilder) then turns into a graph.
///
/// # Example
///
/// ```rust
/// use flowcraft::prelude::*;
/// use flowcraft::error::DocumentError;
///
/// struct Pipeline { steps: Vec<(String, String)> }
///
/// impl IntoWorkflow for Pipeline {
///     fn into_workflow(self) -> Result<WorkflowDocument, DocumentError> {
///         let nodes: Vec<DocumentNode> = self
///             .steps
///             .iter()
///             .map(|(id, kind)| DocumentNode {
///                 id: id.clone(),
///                 node_type: kind.clone(),
///                 position: None,
///                 params: None,
///             })
///             .collect();
///         let edges = self
///             .steps
///             .windows(2)
///             .map(|pair| DocumentEdge {
///                 id: None,
///                 source: pair[0].0.clone(),
///                 source_port: None,
///                 target: pair[1].0.clone(),
///                 target_port: None,
///             })
///             .collect();
///         Ok(WorkflowDocument { name: "pipeline".into(), id: None, nodes, edges })
///     }
/// }
///
/// let pipeline = Pipeline {
///     steps: vec![("in".into(), "source".into()), ("order".into(), "sort".into())],
/// };
/// let graph = WorkflowBuilder::new(pipeline.into_workflow()?).build()?;
/// assert_eq!(graph.edges().len(), 1);
/// # Ok::<(), DocumentError>(())
/// ```
pub trait IntoWorkflow {
    fn into_workflow(self) -> Result<WorkflowDocument, DocumentError>;
}

impl IntoWorkflow for WorkflowDocument {
    fn into_workflow(self) -> Result<WorkflowDocument, DocumentError> {
        Ok(self)
    }
}
