//! Logging utilities for conversation execution.
//!
//! Structured events for conversation lifecycle, turns, tool calls, state
//! updates, and node transitions.

use serde_json::Value;

/// Log conversation start at the entry node.
pub fn log_conversation_start(conversation_id: &str, flow: &str, node_id: &str) {
    tracing::info!(
        conversation_id = conversation_id,
        flow = flow,
        node_id = node_id,
        "Starting conversation"
    );
}

/// Log the beginning of one user turn.
pub fn log_turn_start(conversation_id: &str, node_id: &str, turn: u32) {
    tracing::debug!(
        conversation_id = conversation_id,
        node_id = node_id,
        turn = turn,
        "Turn start"
    );
}

/// Log one tool call dispatch.
pub fn log_tool_call(node_id: &str, tool: &str) {
    tracing::debug!(node_id = node_id, tool = tool, "Calling tool");
}

/// Log a state update applied at the current node.
pub fn log_state_update(node_id: &str, state: &Value) {
    tracing::debug!(node_id = node_id, state = %state, "State updated");
}

/// Log a node transition.
pub fn log_transition(conversation_id: &str, from: &str, to: &str) {
    tracing::info!(
        conversation_id = conversation_id,
        from = from,
        to = to,
        "Node transition"
    );
}

/// Log the end of one user turn.
pub fn log_turn_complete(conversation_id: &str, node_id: &str, turn: u32, transitioned: bool) {
    tracing::debug!(
        conversation_id = conversation_id,
        node_id = node_id,
        turn = turn,
        transitioned = transitioned,
        "Turn complete"
    );
}
