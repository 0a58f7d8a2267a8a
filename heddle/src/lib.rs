//! # Heddle
//!
//! Conversational workflow graphs in Rust: typed dialogue nodes with prompts
//! and tool permissions, connected by predicate-gated edges, driven by a
//! turn-based LLM runtime.
//!
//! ## Design principles
//!
//! - **Typed states, JSON transport**: each node declares a serde state model
//!   and an optional input model; the runtime moves them as JSON and
//!   validates at every boundary.
//! - **Declarative graphs**: a workflow is data — [`NodeSchema`]s and
//!   [`EdgeSchema`]s collected in a [`GraphSchema`] and validated by
//!   `compile()` into an immutable [`CompiledFlow`].
//! - **First satisfied edge wins**: after each user turn the active node's
//!   outgoing edges are evaluated in declaration order; at most one
//!   transition happens per turn.
//! - **State is node-scoped**: edges transform accumulated state into the
//!   next node's input; the destination starts from its own default state.
//!
//! ## Main modules
//!
//! - [`schema`]: [`NodeSchema`], [`EdgeSchema`], [`GraphSchema`],
//!   [`CompiledFlow`], [`SchemaError`] — declare and validate workflows.
//! - [`runtime`]: [`WorkflowRuntime`], [`Conversation`], [`TurnOutcome`],
//!   [`Transition`] — execute conversations.
//! - [`llm`]: [`LlmClient`] trait with [`MockLlm`] and OpenAI-compatible
//!   [`ChatOpenAI`].
//! - [`tool_source`]: [`ToolSource`], [`ToolSpec`], [`MockToolSource`].
//! - [`prompts`]: [`SystemTemplate`] — node system-prompt assembly.
//! - [`airline`]: the airline change-flight workflow configuration
//!   ([`airline::change_flight_flow`]) with domain types, embedded tool
//!   specs, and a fixture tool source.
//!
//! Key types are re-exported at the crate root:
//! `use heddle::{GraphSchema, WorkflowRuntime, Message};`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use heddle::airline::{change_flight_flow, SampleAirlineToolSource};
//! use heddle::{ChatOpenAI, WorkflowRuntime};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let flow = change_flight_flow()?;
//! let runtime = WorkflowRuntime::new(
//!     flow,
//!     Arc::new(ChatOpenAI::new("gpt-4o")),
//!     Arc::new(SampleAirlineToolSource::new()),
//! );
//! let mut conversation = runtime.start_conversation()?;
//! let outcome = conversation.user_turn("Hi, I need to move my flight.").await?;
//! println!("{}", outcome.reply);
//! # Ok(())
//! # }
//! ```
//!
//! Run the scripted example: `cargo run -p heddle-examples --example change_flight_mock`

pub mod airline;
pub mod error;
pub mod llm;
pub mod message;
pub mod prompts;
pub mod runtime;
pub mod schema;
pub mod state;
pub mod tool_source;

pub use error::FlowError;
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, ToolChoiceMode};
pub use message::Message;
pub use prompts::{SystemTemplate, DEFAULT_STATE_GUIDANCE};
pub use runtime::{Conversation, RunOptions, Transition, TurnOutcome, WorkflowRuntime};
pub use schema::{
    CompiledFlow, EdgeSchema, GraphSchema, ModelBinding, NodeSchema, SchemaError,
    TOOL_UPDATE_STATE,
};
pub use state::{InputModel, StateModel, ToolCall, ToolResult};
pub use tool_source::{MockToolSource, ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
