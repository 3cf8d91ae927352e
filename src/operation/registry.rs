use super::{
    FilterParams, GroupParams, NodeKind, NodeOperation, OperationBody, SliceParams, SortParams,
};
use crate::table::{GroupedRows, Rows};
use ahash::AHashMap;

/// Builds the empty operation record for a freshly added node.
///
/// Parameters start empty, `columns` and `input` are empty, and `output` is an empty row
/// set (or an empty grouping for group nodes). Called once per node, when it is added.
pub fn create_default_operation(kind: NodeKind, node_id: &str) -> NodeOperation {
    let body = match kind {
        NodeKind::Source => OperationBody::Source {
            output: Rows::empty(),
        },
        NodeKind::Sort => OperationBody::Sort {
            params: SortParams::default(),
            output: Rows::empty(),
        },
        NodeKind::Slice => OperationBody::Slice {
            params: SliceParams::default(),
            output: Rows::empty(),
        },
        NodeKind::Filter => OperationBody::Filter {
            params: FilterParams::default(),
            output: Rows::empty(),
        },
        NodeKind::Group => OperationBody::Group {
            params: GroupParams::default(),
            output: GroupedRows::empty(),
        },
    };
    NodeOperation {
        node_id: node_id.to_string(),
        columns: Vec::new(),
        input: Rows::empty(),
        body,
    }
}

/// Defines the built-in type names for each node kind, and the functions to register
/// and look them up.
macro_rules! define_node_kinds {
    ( $( $kind:path => [ $( $name:literal ),+ $(,)? ] ),* $(,)? ) => {
        fn register_default_kinds(names: &mut AHashMap<String, NodeKind>) {
            $( $( names.insert($name.to_string(), $kind); )+ )*
        }

        fn builtin_kind_by_name(name: &str) -> Option<NodeKind> {
            match name {
                $( $( $name )|+ => Some($kind), )*
                _ => None,
            }
        }
    };
}

// Canonical names first, then the names used by the canvas.
define_node_kinds! {
    NodeKind::Source => ["source", "selectorNode"],
    NodeKind::Sort => ["sort", "sortNode"],
    NodeKind::Filter => ["filter", "filterNode"],
    NodeKind::Slice => ["slice", "sliceNode"],
    NodeKind::Group => ["group", "groupNode"],
}

/// Resolves node type names, as they appear in documents and canvas events, to kinds.
#[derive(Debug, Clone)]
pub struct KindRegistry {
    names: AHashMap<String, NodeKind>,
}

impl Default for KindRegistry {
    fn default() -> Self {
        let mut names = AHashMap::new();
        register_default_kinds(&mut names);
        Self { names }
    }
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a custom type name onto the kind behind a built-in name.
    /// Unknown built-in names are ignored.
    pub fn with_alias(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        if let Some(kind) = builtin_kind_by_name(builtin_type_name) {
            self.names.insert(user_type_name.to_string(), kind);
        }
        self
    }

    pub fn resolve(&self, type_name: &str) -> Option<NodeKind> {
        self.names.get(type_name).copied()
    }
}
