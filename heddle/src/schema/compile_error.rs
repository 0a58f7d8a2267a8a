//! Schema compilation error.
//!
//! Returned by `GraphSchema::compile` when the declared nodes and edges do
//! not form a valid workflow.

use thiserror::Error;

/// Validation failure while compiling a [`GraphSchema`](super::GraphSchema).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An edge references a node id that was never declared.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Two nodes were declared with the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// No start node was set on a non-empty graph.
    #[error("no start node set")]
    MissingStart,

    /// The declared start node id is unknown.
    #[error("start node not found: {0}")]
    StartNotFound(String),

    /// A declared node cannot be reached from the start node.
    #[error("unreachable node: {0}")]
    UnreachableNode(String),

    /// An edge's captured state type differs from the source node's declared
    /// state model.
    #[error("edge {edge}: state type mismatch (node declares {expected}, edge captured {found})")]
    StateTypeMismatch {
        edge: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An edge's captured input type differs from what the source or
    /// destination node declares.
    #[error("edge {edge}: input type mismatch (node declares {expected}, edge captured {found})")]
    InputTypeMismatch {
        edge: String,
        expected: &'static str,
        found: &'static str,
    },
}
