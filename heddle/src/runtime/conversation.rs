//! Conversation runtime: drive a compiled flow turn by turn.
//!
//! [`WorkflowRuntime`] owns the compiled flow, an LLM client, and a tool
//! source; [`Conversation`] is one live session. A user turn runs the current
//! node's prompt/tool loop until the LLM answers without tool calls, then
//! evaluates the node's outgoing edges against accumulated state and follows
//! the first satisfied one.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::error::FlowError;
use crate::llm::{LlmClient, LlmUsage};
use crate::message::Message;
use crate::schema::{CompiledFlow, NodeSchema, TOOL_UPDATE_STATE};
use crate::state::{shallow_merge, InputModel, StateModel, ToolCall};
use crate::tool_source::{ToolSource, ToolSpec};

use super::logging::{
    log_conversation_start, log_state_update, log_tool_call, log_transition, log_turn_complete,
    log_turn_start,
};

/// Options for conversation execution.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Maximum tool rounds within one user turn. On exhaustion the turn ends
    /// with the last assistant text and a warning; it is not an error.
    pub max_tool_rounds: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { max_tool_rounds: 8 }
    }
}

/// One node transition taken at the end of a user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Source node id.
    pub from: String,
    /// Destination node id.
    pub to: String,
    /// Zero-based user turn after which the transition fired.
    pub turn: u32,
}

/// Result of one user turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The last non-empty assistant reply of the turn.
    pub reply: String,
    /// The transition taken after the turn, if any.
    pub transition: Option<Transition>,
    /// Accumulated token usage over the turn's LLM rounds, when reported.
    pub usage: Option<LlmUsage>,
}

/// Executes conversations over one compiled flow.
///
/// Cheap to clone per conversation: the flow, LLM, and tool source are
/// shared behind `Arc`.
pub struct WorkflowRuntime {
    flow: Arc<CompiledFlow>,
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    options: RunOptions,
}

impl WorkflowRuntime {
    /// Creates a runtime over the given flow, LLM, and tool source.
    pub fn new(flow: CompiledFlow, llm: Arc<dyn LlmClient>, tools: Arc<dyn ToolSource>) -> Self {
        Self {
            flow: Arc::new(flow),
            llm,
            tools,
            options: RunOptions::default(),
        }
    }

    /// Replaces the run options (builder).
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// The compiled flow this runtime executes.
    pub fn flow(&self) -> &CompiledFlow {
        &self.flow
    }

    /// Starts a conversation at the flow's start node, which must not declare
    /// an input model.
    pub fn start_conversation(&self) -> Result<Conversation, FlowError> {
        let start = self.start_node()?;
        if let Some(binding) = start.input() {
            return Err(FlowError::InvalidState(format!(
                "start node {} requires input {}; use start_conversation_with",
                start.id(),
                binding.type_name()
            )));
        }
        self.seed(start, Value::Null)
    }

    /// Starts a conversation at the flow's start node with a typed input.
    pub fn start_conversation_with<I: InputModel>(
        &self,
        input: I,
    ) -> Result<Conversation, FlowError> {
        let start = self.start_node()?;
        match start.input() {
            Some(binding) if binding.matches::<I>() => {}
            Some(binding) => {
                return Err(FlowError::InvalidState(format!(
                    "start node {} declares input {}, got {}",
                    start.id(),
                    binding.type_name(),
                    std::any::type_name::<I>()
                )))
            }
            None => {
                return Err(FlowError::InvalidState(format!(
                    "start node {} takes no input",
                    start.id()
                )))
            }
        }
        let value = serde_json::to_value(input)
            .map_err(|e| FlowError::InvalidState(format!("start input not serializable: {}", e)))?;
        self.seed(start, value)
    }

    fn start_node(&self) -> Result<Arc<NodeSchema>, FlowError> {
        self.flow
            .node(self.flow.start_id())
            .cloned()
            .ok_or_else(|| {
                FlowError::ExecutionFailed(format!("unknown start node: {}", self.flow.start_id()))
            })
    }

    fn seed(&self, start: Arc<NodeSchema>, input: Value) -> Result<Conversation, FlowError> {
        let id = Uuid::new_v4().to_string();
        let state = start.state().default_value()?;
        let input_for_prompt = start.input().map(|_| &input);
        let system = start.render_system_prompt(input_for_prompt);
        log_conversation_start(&id, self.flow.name(), start.id());
        Ok(Conversation {
            id,
            flow: Arc::clone(&self.flow),
            llm: Arc::clone(&self.llm),
            tools: Arc::clone(&self.tools),
            options: self.options.clone(),
            current: start,
            state,
            input,
            messages: vec![Message::system(system)],
            transitions: vec![],
            turn: 0,
        })
    }
}

/// One live conversation: current node, accumulated state, message history.
pub struct Conversation {
    id: String,
    flow: Arc<CompiledFlow>,
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    options: RunOptions,
    current: Arc<NodeSchema>,
    state: Value,
    input: Value,
    messages: Vec<Message>,
    transitions: Vec<Transition>,
    turn: u32,
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("id", &self.id)
            .field("current", &self.current.id())
            .field("state", &self.state)
            .field("input", &self.input)
            .field("messages", &self.messages.len())
            .field("transitions", &self.transitions)
            .field("turn", &self.turn)
            .finish()
    }
}

impl Conversation {
    /// Conversation id (v4 UUID).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the active node.
    pub fn current_node(&self) -> &str {
        self.current.id()
    }

    /// Full message history, including node system prompts and tool results.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Transitions taken so far, in order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Whether the active node has no outgoing edges.
    pub fn is_terminal(&self) -> bool {
        self.flow.is_terminal(self.current.id())
    }

    /// Raw accumulated state of the active node.
    pub fn state_value(&self) -> &Value {
        &self.state
    }

    /// Raw input the active node was entered with (`null` for the start node
    /// when it declares no input).
    pub fn input_value(&self) -> &Value {
        &self.input
    }

    /// Typed snapshot of the active node's state.
    pub fn state<S: StateModel>(&self) -> Result<S, FlowError> {
        serde_json::from_value(self.state.clone()).map_err(|e| {
            FlowError::InvalidState(format!(
                "state of node {} is not {}: {}",
                self.current.id(),
                std::any::type_name::<S>(),
                e
            ))
        })
    }

    /// Runs one user turn: prompt/tool loop, then edge evaluation.
    ///
    /// Tool failures (unknown tool, unpermitted tool, bad arguments, source
    /// errors) are folded into the conversation as tool-result text so the
    /// LLM can correct itself; only infrastructure failures (LLM transport,
    /// state/input type breakage) abort with `Err`.
    pub async fn user_turn(&mut self, text: &str) -> Result<TurnOutcome, FlowError> {
        log_turn_start(&self.id, self.current.id(), self.turn);
        self.messages.push(Message::user(text));

        let specs = self.permitted_specs().await?;
        let mut reply = String::new();
        let mut usage: Option<LlmUsage> = None;
        let mut rounds = 0u32;

        loop {
            let response = self.llm.invoke(&self.messages, &specs).await?;
            usage = match (usage, &response.usage) {
                (Some(a), Some(b)) => Some(a.add(b)),
                (Some(a), None) => Some(a),
                (None, b) => b.clone(),
            };
            if !response.content.is_empty() {
                reply = response.content.clone();
            }
            self.messages.push(Message::assistant(response.content));
            if response.tool_calls.is_empty() {
                break;
            }
            if rounds >= self.options.max_tool_rounds {
                warn!(
                    conversation_id = %self.id,
                    node_id = self.current.id(),
                    max_tool_rounds = self.options.max_tool_rounds,
                    "Tool round budget exhausted; ending turn"
                );
                break;
            }
            rounds += 1;
            for call in &response.tool_calls {
                let outcome = self.execute_tool(call).await;
                self.messages
                    .push(Message::user(format!("Tool {}: {}", call.name, outcome)));
            }
        }

        let transition = self.maybe_transition()?;
        log_turn_complete(&self.id, self.current.id(), self.turn, transition.is_some());
        self.turn += 1;
        Ok(TurnOutcome {
            reply,
            transition,
            usage,
        })
    }

    /// Builds the tool list for the active node: permitted specs from the
    /// source plus the node's state-update tool.
    async fn permitted_specs(&self) -> Result<Vec<ToolSpec>, FlowError> {
        let listed = self.tools.list_tools().await?;
        let mut specs = Vec::with_capacity(self.current.tool_names().len() + 1);
        for name in self.current.tool_names() {
            match listed.iter().find(|s| &s.name == name) {
                Some(spec) => specs.push(spec.clone()),
                None => warn!(
                    node_id = self.current.id(),
                    tool = %name,
                    "Permitted tool missing from tool source"
                ),
            }
        }
        specs.push(self.current.state_update_spec());
        Ok(specs)
    }

    /// Executes one tool call, returning the text folded into the history.
    async fn execute_tool(&mut self, call: &ToolCall) -> String {
        log_tool_call(self.current.id(), &call.name);
        let arguments: Value = if call.arguments.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            match serde_json::from_str(&call.arguments) {
                Ok(v) => v,
                Err(e) => return format!("Error: invalid tool arguments: {}", e),
            }
        };

        if call.name == TOOL_UPDATE_STATE {
            return self.apply_state_update(arguments);
        }
        if !self.current.allows_tool(&call.name) {
            warn!(
                node_id = self.current.id(),
                tool = %call.name,
                "LLM called a tool not permitted at this node"
            );
            return format!("Error: tool not available in this step: {}", call.name);
        }
        match self.tools.call_tool(&call.name, arguments).await {
            Ok(content) => content.text,
            Err(e) => format!("Error: {}", e),
        }
    }

    /// Merges a state update, validating against the node's typed model.
    /// On any failure the state is left untouched and the error is returned
    /// as tool-result text.
    fn apply_state_update(&mut self, update: Value) -> String {
        let merged = match shallow_merge(&self.state, &update) {
            Ok(v) => v,
            Err(msg) => return format!("Error: {}", msg),
        };
        if let Err(msg) = self.current.state().validate(&merged) {
            return format!("Error: state update rejected: {}", msg);
        }
        self.state = merged;
        log_state_update(self.current.id(), &self.state);
        "state updated".to_string()
    }

    /// Evaluates the active node's outgoing edges in declaration order and
    /// follows the first satisfied one.
    fn maybe_transition(&mut self) -> Result<Option<Transition>, FlowError> {
        let edges = self.flow.outgoing(self.current.id()).to_vec();
        for edge in edges {
            if !edge.evaluate(&self.state)? {
                continue;
            }
            let next_input = edge.next_input(&self.state, &self.input)?;
            let next = self.flow.node(edge.to()).cloned().ok_or_else(|| {
                FlowError::ExecutionFailed(format!("unknown node: {}", edge.to()))
            })?;

            let transition = Transition {
                from: self.current.id().to_string(),
                to: next.id().to_string(),
                turn: self.turn,
            };
            log_transition(&self.id, &transition.from, &transition.to);

            self.state = next.state().default_value()?;
            let input_for_prompt = next.input().map(|_| &next_input);
            self.messages
                .push(Message::system(next.render_system_prompt(input_for_prompt)));
            self.input = next_input;
            self.current = next;
            self.transitions.push(transition.clone());
            return Ok(Some(transition));
        }
        Ok(None)
    }
}
