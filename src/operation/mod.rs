use crate::error::{RunError, TransformError};
use crate::table::{GroupedRows, RowSet, Rows, TabularValue};
use crate::transform::{
    FilterMode, SortOrder, filter_rows, group_rows, parse_bound, slice_rows, sort_rows,
};
use serde::{Deserialize, Serialize};
use std::fmt;

mod registry;

pub use registry::{KindRegistry, create_default_operation};

/// The five kinds of step a workflow node can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Source,
    Sort,
    Filter,
    Slice,
    Group,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Source,
        NodeKind::Sort,
        NodeKind::Filter,
        NodeKind::Slice,
        NodeKind::Group,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Source => "source",
            NodeKind::Sort => "sort",
            NodeKind::Filter => "filter",
            NodeKind::Slice => "slice",
            NodeKind::Group => "group",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortParams {
    #[serde(alias = "key")]
    pub column: String,
    pub order: SortOrder,
}

/// Slice bounds are kept exactly as typed; they are parsed when the node runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceParams {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    #[serde(alias = "key")]
    pub column: String,
    pub value: String,
    #[serde(alias = "filterType")]
    pub mode: FilterMode,
    pub invert: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupParams {
    #[serde(alias = "key")]
    pub column: String,
}

/// The kind-specific half of a [`NodeOperation`]: parameters and last computed output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationBody {
    Source { output: Rows },
    Sort { params: SortParams, output: Rows },
    Slice { params: SliceParams, output: Rows },
    Filter { params: FilterParams, output: Rows },
    Group { params: GroupParams, output: GroupedRows },
}

/// Per-node record of parameters, last pushed input and last computed output.
///
/// `columns` and `input` are replaced wholesale by propagation; `output` only changes when
/// the node is run (or, for a source node, when data is uploaded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOperation {
    pub node_id: String,
    pub columns: Vec<String>,
    pub input: Rows,
    pub body: OperationBody,
}

impl NodeOperation {
    /// A source operation that publishes `rows` with the given columns.
    pub fn source(node_id: impl Into<String>, columns: Vec<String>, rows: Rows) -> Self {
        Self {
            node_id: node_id.into(),
            columns,
            input: Rows::empty(),
            body: OperationBody::Source { output: rows },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            OperationBody::Source { .. } => NodeKind::Source,
            OperationBody::Sort { .. } => NodeKind::Sort,
            OperationBody::Slice { .. } => NodeKind::Slice,
            OperationBody::Filter { .. } => NodeKind::Filter,
            OperationBody::Group { .. } => NodeKind::Group,
        }
    }

    /// The flat output this node hands to downstream nodes.
    ///
    /// Group nodes produce buckets rather than a flat row set, so they forward nothing.
    pub fn forwarded_output(&self) -> Option<&Rows> {
        match &self.body {
            OperationBody::Source { output }
            | OperationBody::Sort { output, .. }
            | OperationBody::Slice { output, .. }
            | OperationBody::Filter { output, .. } => Some(output),
            OperationBody::Group { .. } => None,
        }
    }

    /// The last computed output as a tabular value.
    pub fn output_value(&self) -> TabularValue {
        match &self.body {
            OperationBody::Group { output, .. } => TabularValue::Grouped(output.clone()),
            OperationBody::Source { output }
            | OperationBody::Sort { output, .. }
            | OperationBody::Slice { output, .. }
            | OperationBody::Filter { output, .. } => {
                TabularValue::Rows(RowSet::new(self.columns.clone(), output.clone()))
            }
        }
    }

    /// Returns a copy carrying new upstream data, with everything else unchanged.
    pub fn with_input(&self, input: Rows, columns: Vec<String>) -> Self {
        Self {
            input,
            columns,
            ..self.clone()
        }
    }

    /// Runs the node's transform over its current input.
    ///
    /// Returns `Ok(None)` when there is nothing to run: a source node, or an empty input.
    /// On success the returned operation carries the new output; `self` is never touched.
    pub fn execute(&self) -> Result<Option<NodeOperation>, RunError> {
        if self.kind() == NodeKind::Source || self.input.is_empty() {
            return Ok(None);
        }

        let body = self
            .compute_body()
            .map_err(|source| RunError::Transform {
                node_id: self.node_id.clone(),
                source,
            })?;

        Ok(Some(Self {
            body,
            ..self.clone()
        }))
    }

    fn compute_body(&self) -> Result<OperationBody, TransformError> {
        let input = &self.input;
        Ok(match &self.body {
            OperationBody::Source { output } => OperationBody::Source {
                output: output.clone(),
            },
            OperationBody::Sort { params, .. } => OperationBody::Sort {
                params: params.clone(),
                output: sort_rows(input, &params.column, params.order).into(),
            },
            OperationBody::Slice { params, .. } => {
                let start =
                    parse_bound(&params.start).ok_or_else(|| TransformError::InvalidSliceBound {
                        bound: "start",
                        value: params.start.clone(),
                    })?;
                let end =
                    parse_bound(&params.end).ok_or_else(|| TransformError::InvalidSliceBound {
                        bound: "end",
                        value: params.end.clone(),
                    })?;
                OperationBody::Slice {
                    params: params.clone(),
                    output: slice_rows(input, start, end).into(),
                }
            }
            OperationBody::Filter { params, .. } => OperationBody::Filter {
                params: params.clone(),
                output: filter_rows(
                    input,
                    &params.mode,
                    &params.column,
                    &params.value,
                    params.invert,
                )?
                .into(),
            },
            OperationBody::Group { params, .. } => OperationBody::Group {
                params: params.clone(),
                output: group_rows(input, &params.column),
            },
        })
    }
}
