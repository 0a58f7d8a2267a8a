//! Runtime error types for conversation execution.
//!
//! Used by `Conversation::user_turn` and everything it drives (LLM calls,
//! tool dispatch, state validation, edge traversal).

use thiserror::Error;

use crate::tool_source::ToolSourceError;

/// Error from driving a conversation through the workflow graph.
///
/// Returned by `WorkflowRuntime::start_conversation*` and
/// `Conversation::user_turn`. Schema construction problems are reported
/// earlier, by [`SchemaError`](crate::schema::SchemaError) at compile time.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A step failed (e.g. LLM call failed, malformed response).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Accumulated state or input no longer matches the typed model a node
    /// or edge declared (deserialization failed, or an edge transform could
    /// not produce the next input).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Listing or calling tools failed at the tool source.
    #[error("tool source error: {0}")]
    Tool(#[from] ToolSourceError),
}
