//! Conversation runtime: execute a compiled flow against an LLM and tools.
//!
//! [`WorkflowRuntime`] binds a [`CompiledFlow`](crate::schema::CompiledFlow)
//! to an LLM client and a tool source; [`Conversation`] drives one session
//! turn by turn.

mod conversation;
mod logging;

pub use conversation::{Conversation, RunOptions, Transition, TurnOutcome, WorkflowRuntime};
pub use logging::{
    log_conversation_start, log_state_update, log_tool_call, log_transition, log_turn_complete,
    log_turn_start,
};
