//! Node schema: one dialogue state with prompt, tool permissions, and typed models.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::FlowError;
use crate::prompts::SystemTemplate;
use crate::state::{InputModel, StateModel};
use crate::tool_source::ToolSpec;

use super::TypeMark;

/// Name of the auto-generated tool every node exposes for recording state.
pub const TOOL_UPDATE_STATE: &str = "update_state";

/// Type-erased handle to a node's state or input model.
///
/// Captures the static type (for compile-time checks against edges), a
/// default factory and validator (state models), and the LLM-facing JSON
/// schema used for the node's state-update tool.
#[derive(Clone)]
pub struct ModelBinding {
    mark: TypeMark,
    default_value: Option<Arc<dyn Fn() -> Result<Value, String> + Send + Sync>>,
    validate: Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>,
    schema: Value,
}

impl ModelBinding {
    /// Binds a state model with its LLM-facing JSON schema.
    pub fn state<S: StateModel>(schema: Value) -> Self {
        Self {
            mark: TypeMark::of::<S>(),
            default_value: Some(Arc::new(|| {
                serde_json::to_value(S::default()).map_err(|e| e.to_string())
            })),
            validate: Arc::new(|value: &Value| {
                serde_json::from_value::<S>(value.clone())
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            }),
            schema,
        }
    }

    /// Binds an input model. Inputs are built by edge transforms, never
    /// defaulted, and carry no LLM-facing schema.
    pub fn input<I: InputModel>() -> Self {
        Self {
            mark: TypeMark::of::<I>(),
            default_value: None,
            validate: Arc::new(|value: &Value| {
                serde_json::from_value::<I>(value.clone())
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            }),
            schema: Value::Null,
        }
    }

    pub(crate) fn mark(&self) -> TypeMark {
        self.mark
    }

    /// The bound model's type name (diagnostics).
    pub fn type_name(&self) -> &'static str {
        self.mark.name()
    }

    /// The LLM-facing JSON schema (state bindings only).
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// A fresh default value for the bound model.
    ///
    /// Only state bindings have one; calling this on an input binding is a
    /// configuration bug and reported as such.
    pub fn default_value(&self) -> Result<Value, FlowError> {
        match &self.default_value {
            Some(factory) => factory().map_err(|e| {
                FlowError::InvalidState(format!(
                    "default for {} is not serializable: {}",
                    self.mark.name(),
                    e
                ))
            }),
            None => Err(FlowError::InvalidState(format!(
                "{} is an input model and has no default",
                self.mark.name()
            ))),
        }
    }

    /// Checks that a JSON value deserializes into the bound model.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        (self.validate)(value)
    }

    pub(crate) fn matches<T: 'static>(&self) -> bool {
        self.mark.id() == TypeId::of::<T>()
    }
}

impl fmt::Debug for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBinding")
            .field("type", &self.mark.name())
            .field("has_default", &self.default_value.is_some())
            .finish()
    }
}

/// Immutable descriptor of one dialogue state.
///
/// Holds the node's task prompt, the shared system template, the permitted
/// tool names, and the typed state/input bindings. Constructed once when the
/// graph is declared; read-only thereafter.
#[derive(Debug, Clone)]
pub struct NodeSchema {
    id: String,
    node_prompt: String,
    system_template: SystemTemplate,
    tool_names: Vec<String>,
    input: Option<ModelBinding>,
    state: ModelBinding,
}

impl NodeSchema {
    /// Creates a node with the given id, task prompt, template, and state binding.
    ///
    /// Use [`with_input`](Self::with_input) and [`with_tools`](Self::with_tools)
    /// to complete the declaration.
    pub fn new(
        id: impl Into<String>,
        node_prompt: impl Into<String>,
        system_template: SystemTemplate,
        state: ModelBinding,
    ) -> Self {
        Self {
            id: id.into(),
            node_prompt: node_prompt.into(),
            system_template,
            tool_names: vec![],
            input: None,
            state,
        }
    }

    /// Declares the node's input model (builder).
    pub fn with_input<I: InputModel>(mut self) -> Self {
        self.input = Some(ModelBinding::input::<I>());
        self
    }

    /// Declares the tools the LLM may call while this node is active (builder).
    pub fn with_tools<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.tool_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Node id, unique within a graph.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The node's task prompt text.
    pub fn node_prompt(&self) -> &str {
        &self.node_prompt
    }

    /// Permitted tool names, in declaration order.
    pub fn tool_names(&self) -> &[String] {
        &self.tool_names
    }

    /// Whether the LLM may call `name` while this node is active.
    pub fn allows_tool(&self, name: &str) -> bool {
        self.tool_names.iter().any(|n| n == name)
    }

    /// The node's state binding.
    pub fn state(&self) -> &ModelBinding {
        &self.state
    }

    /// The node's input binding, when declared.
    pub fn input(&self) -> Option<&ModelBinding> {
        self.input.as_ref()
    }

    /// Renders the full system prompt for entering this node with `input`.
    pub fn render_system_prompt(&self, input: Option<&Value>) -> String {
        self.system_template.render(&self.node_prompt, input)
    }

    /// The auto-generated state-update tool spec for this node.
    pub fn state_update_spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_UPDATE_STATE.to_string(),
            description: Some(
                "Record details gathered for the current task. Pass only the fields you \
                 have just confirmed; previously recorded fields are kept."
                    .to_string(),
            ),
            input_schema: self.state.schema().clone(),
        }
    }

    pub(crate) fn input_mark(&self) -> TypeMark {
        self.input
            .as_ref()
            .map(|b| b.mark())
            .unwrap_or_else(TypeMark::unit)
    }
}
