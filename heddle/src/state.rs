//! Typed state and tool-call types for workflow nodes.
//!
//! Every node declares a state model (what the conversation accumulates while
//! the node is active) and optionally an input model (what the previous node
//! handed over). Both are plain serde structs; the runtime moves them around
//! as `serde_json::Value` and deserializes back whenever a predicate or
//! transform needs the typed view.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker for node state models.
///
/// State is seeded from `Default` when a node is entered, so every field a
/// predicate references exists from the first turn (unset fields are `None`
/// or empty, never missing). Implemented automatically for any serde struct
/// that satisfies the bounds.
pub trait StateModel:
    Clone + Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> StateModel for T where
    T: Clone + Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Marker for node input models.
///
/// Inputs are produced by edge transforms and are read-only for the lifetime
/// of the node. Nodes without an input model use `()`.
pub trait InputModel: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> InputModel for T where T: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// A single tool invocation produced by the LLM and executed by the runtime.
///
/// `arguments` is the raw JSON string from the model; the runtime parses it
/// when dispatching. Optional `id` correlates results in provider protocols.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name as listed by the tool source (or the state-update tool).
    pub name: String,
    /// Arguments as a JSON string; parsed by the runtime before dispatch.
    pub arguments: String,
    /// Optional provider-assigned id for this call.
    pub id: Option<String>,
}

impl ToolCall {
    /// Creates a tool call with the given name and raw JSON arguments.
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
            id: None,
        }
    }

    /// Sets the provider call id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Result of executing one tool call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the tool call this result belongs to (if the call had one).
    pub call_id: Option<String>,
    /// Tool name; alternative to `call_id` for matching.
    pub name: Option<String>,
    /// Result content as text.
    pub content: String,
}

/// Shallow per-field merge of a state update into the current state.
///
/// Both values must be JSON objects. Top-level fields from `update` replace
/// the corresponding fields of `state`; a field not declared by the state
/// model (i.e. absent from the seeded default) is rejected so the LLM gets
/// corrective feedback instead of silently growing the state.
pub(crate) fn shallow_merge(state: &Value, update: &Value) -> Result<Value, String> {
    let current = state
        .as_object()
        .ok_or_else(|| "state is not a JSON object".to_string())?;
    let fields = update
        .as_object()
        .ok_or_else(|| "update must be a JSON object".to_string())?;

    let mut merged = current.clone();
    for (key, value) in fields {
        if !merged.contains_key(key) {
            return Err(format!("unknown state field: {}", key));
        }
        merged.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(merged))
}
