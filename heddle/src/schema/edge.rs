//! Edge schema: a predicate-gated transition carrying an input transformation.

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::FlowError;
use crate::state::{InputModel, StateModel};

/// Static type captured by an edge or declared by a node, compared at
/// `GraphSchema::compile` time.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) struct TypeMark {
    id: TypeId,
    name: &'static str,
}

impl TypeMark {
    pub(crate) fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The mark for `()`, used by nodes without an input model.
    pub(crate) fn unit() -> Self {
        Self::of::<()>()
    }

    pub(crate) fn id(&self) -> TypeId {
        self.id
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for TypeMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type ErasedCondition = Arc<dyn Fn(&Value) -> Result<bool, FlowError> + Send + Sync>;
type ErasedBuildInput = Arc<dyn Fn(&Value, &Value) -> Result<Value, FlowError> + Send + Sync>;

/// Directed transition between two nodes.
///
/// `condition` reads the source node's accumulated state; when it holds after
/// a turn, `build_input` maps (state, current input) to the destination
/// node's input. Typed closures are captured at construction and type-erased
/// over JSON values; the static types are kept so `compile()` can check them
/// against the node declarations.
#[derive(Clone)]
pub struct EdgeSchema {
    from: String,
    to: String,
    condition: ErasedCondition,
    build_input: ErasedBuildInput,
    state_type: TypeMark,
    input_type: TypeMark,
    next_input_type: TypeMark,
}

impl EdgeSchema {
    /// Creates an edge from typed closures.
    ///
    /// * `FS` — the source node's state model; `FI` — the source node's input
    ///   model (`()` when it has none); `TI` — the destination node's input
    ///   model.
    /// * `condition` gates the transition on the accumulated state.
    /// * `build_input` returns `None` when a field it needs is missing; since
    ///   it only runs after `condition` held, `None` indicates a
    ///   configuration bug and is surfaced as
    ///   [`FlowError::InvalidState`].
    pub fn new<FS, FI, TI>(
        from: impl Into<String>,
        to: impl Into<String>,
        condition: impl Fn(&FS) -> bool + Send + Sync + 'static,
        build_input: impl Fn(&FS, &FI) -> Option<TI> + Send + Sync + 'static,
    ) -> Self
    where
        FS: StateModel,
        FI: InputModel,
        TI: InputModel,
    {
        let from = from.into();
        let to = to.into();
        let label = format!("{} -> {}", from, to);
        let condition_label = label.clone();

        let erased_condition: ErasedCondition = Arc::new(move |state: &Value| {
            let typed: FS = serde_json::from_value(state.clone()).map_err(|e| {
                FlowError::InvalidState(format!(
                    "edge {}: state is not {}: {}",
                    condition_label,
                    type_name::<FS>(),
                    e
                ))
            })?;
            Ok(condition(&typed))
        });

        let build_label = label;
        let erased_build: ErasedBuildInput = Arc::new(move |state: &Value, input: &Value| {
            let typed_state: FS = serde_json::from_value(state.clone()).map_err(|e| {
                FlowError::InvalidState(format!(
                    "edge {}: state is not {}: {}",
                    build_label,
                    type_name::<FS>(),
                    e
                ))
            })?;
            let typed_input: FI = serde_json::from_value(input.clone()).map_err(|e| {
                FlowError::InvalidState(format!(
                    "edge {}: input is not {}: {}",
                    build_label,
                    type_name::<FI>(),
                    e
                ))
            })?;
            let next = build_input(&typed_state, &typed_input).ok_or_else(|| {
                FlowError::InvalidState(format!(
                    "edge {}: satisfied condition but a required state field was missing",
                    build_label
                ))
            })?;
            serde_json::to_value(next).map_err(|e| {
                FlowError::InvalidState(format!(
                    "edge {}: next input is not serializable: {}",
                    build_label, e
                ))
            })
        });

        Self {
            from,
            to,
            condition: erased_condition,
            build_input: erased_build,
            state_type: TypeMark::of::<FS>(),
            input_type: TypeMark::of::<FI>(),
            next_input_type: TypeMark::of::<TI>(),
        }
    }

    /// Source node id.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Destination node id.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Evaluates the predicate against accumulated state.
    pub fn evaluate(&self, state: &Value) -> Result<bool, FlowError> {
        (self.condition)(state)
    }

    /// Builds the destination node's input from (state, current input).
    pub fn next_input(&self, state: &Value, input: &Value) -> Result<Value, FlowError> {
        (self.build_input)(state, input)
    }

    pub(crate) fn state_mark(&self) -> TypeMark {
        self.state_type
    }

    pub(crate) fn input_mark(&self) -> TypeMark {
        self.input_type
    }

    pub(crate) fn next_input_mark(&self) -> TypeMark {
        self.next_input_type
    }

    pub(crate) fn label(&self) -> String {
        format!("{} -> {}", self.from, self.to)
    }
}

impl fmt::Debug for EdgeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeSchema")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("state", &self.state_type)
            .field("input", &self.input_type)
            .field("next_input", &self.next_input_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct CountState {
        count: Option<u32>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct CountInput {
        count: u32,
    }

    fn edge() -> EdgeSchema {
        EdgeSchema::new(
            "a",
            "b",
            |state: &CountState| state.count.is_some(),
            |state: &CountState, _input: &()| Some(CountInput { count: state.count? }),
        )
    }

    /// **Scenario**: predicate is false on default state, true once the field is set.
    #[test]
    fn evaluate_follows_state_population() {
        let e = edge();
        assert!(!e.evaluate(&json!({ "count": null })).unwrap());
        assert!(e.evaluate(&json!({ "count": 3 })).unwrap());
    }

    /// **Scenario**: next_input builds the destination input from state.
    #[test]
    fn next_input_builds_destination_input() {
        let e = edge();
        let next = e.next_input(&json!({ "count": 3 }), &Value::Null).unwrap();
        assert_eq!(next, json!({ "count": 3 }));
    }

    /// **Scenario**: a state value that does not match the captured type is an InvalidState error.
    #[test]
    fn evaluate_rejects_mistyped_state() {
        let e = edge();
        let err = e.evaluate(&json!({ "count": "three" })).unwrap_err();
        assert!(matches!(err, FlowError::InvalidState(_)), "{:?}", err);
    }

    /// **Scenario**: a None from build_input surfaces as InvalidState naming the edge.
    #[test]
    fn next_input_none_is_invalid_state() {
        let e = EdgeSchema::new(
            "a",
            "b",
            |_: &CountState| true,
            |state: &CountState, _: &()| Some(CountInput { count: state.count? }),
        );
        let err = e.next_input(&json!({ "count": null }), &Value::Null).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("a -> b"), "{}", msg);
    }
}
