//! Conversation runtime behavior: state accumulation, tool permission
//! enforcement, and edge evaluation order.
//!
//! Drives small graphs with a scripted MockLlm; no real LLM or tools.

mod init_logging;

use std::sync::Arc;

use heddle::{
    CompiledFlow, EdgeSchema, GraphSchema, LlmResponse, Message, MockLlm, MockToolSource,
    ModelBinding, NodeSchema, SystemTemplate, ToolCall, ToolSpec, WorkflowRuntime,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CollectState {
    a: Option<String>,
    b: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Handoff {
    a: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DoneState {
    closed: bool,
}

fn template() -> SystemTemplate {
    SystemTemplate::new("You are a test agent.")
}

fn collect_node() -> NodeSchema {
    NodeSchema::new(
        "collect",
        "Collect a and b.",
        template(),
        ModelBinding::state::<CollectState>(json!({
            "type": "object",
            "properties": {
                "a": { "type": ["string", "null"] },
                "b": { "type": ["string", "null"] }
            },
            "additionalProperties": false
        })),
    )
    .with_tools(["echo"])
}

fn done_node(id: &str) -> NodeSchema {
    NodeSchema::new(
        id,
        "Wrap up.",
        template(),
        ModelBinding::state::<DoneState>(json!({
            "type": "object",
            "properties": { "closed": { "type": "boolean" } },
            "additionalProperties": false
        })),
    )
    .with_input::<Handoff>()
}

fn echo_spec() -> ToolSpec {
    ToolSpec {
        name: "echo".to_string(),
        description: Some("Echo.".to_string()),
        input_schema: json!({ "type": "object", "properties": {} }),
    }
}

/// Chain collect -> finish, gated on both fields being set.
fn both_fields_flow() -> CompiledFlow {
    let mut graph = GraphSchema::new("both_fields");
    graph
        .add_node(collect_node())
        .add_node(done_node("finish"))
        .add_edge(EdgeSchema::new(
            "collect",
            "finish",
            |s: &CollectState| s.a.is_some() && s.b.is_some(),
            |s: &CollectState, _: &()| Some(Handoff { a: s.a.clone()? }),
        ))
        .set_start("collect");
    graph.compile().expect("valid graph")
}

fn update_state_call(args: serde_json::Value) -> ToolCall {
    ToolCall::new("update_state", args.to_string())
}

fn runtime(flow: CompiledFlow, llm: MockLlm) -> WorkflowRuntime {
    WorkflowRuntime::new(
        flow,
        Arc::new(llm),
        Arc::new(MockToolSource::new(vec![echo_spec()])),
    )
}

/// State accumulates across turns; the edge only fires once its fields are populated.
#[tokio::test]
async fn state_accumulates_and_edge_fires_when_populated() {
    let llm = MockLlm::scripted(vec![
        LlmResponse::calling("noting a", vec![update_state_call(json!({ "a": "x" }))]),
        LlmResponse::text("Got a."),
        LlmResponse::calling("noting b", vec![update_state_call(json!({ "b": "y" }))]),
        LlmResponse::text("Got b."),
    ]);
    let runtime = runtime(both_fields_flow(), llm);
    let mut conversation = runtime.start_conversation().expect("start");

    let first = conversation.user_turn("here is a").await.unwrap();
    assert!(first.transition.is_none());
    let state: CollectState = conversation.state().unwrap();
    assert_eq!(state.a.as_deref(), Some("x"));
    assert_eq!(state.b, None);

    let second = conversation.user_turn("and b").await.unwrap();
    let transition = second.transition.expect("edge should fire");
    assert_eq!(transition.from, "collect");
    assert_eq!(transition.to, "finish");
    assert_eq!(conversation.current_node(), "finish");
    assert!(conversation.is_terminal());

    // The destination starts from its own default state and receives the
    // transformed input.
    let state: DoneState = conversation.state().unwrap();
    assert!(!state.closed);
    assert_eq!(conversation.input_value(), &json!({ "a": "x" }));
    assert_eq!(conversation.transitions().len(), 1);
}

/// An update naming a field the state model never declared is reported back
/// to the LLM as a tool error and leaves the state untouched.
#[tokio::test]
async fn unknown_state_field_is_rejected() {
    let llm = MockLlm::scripted(vec![
        LlmResponse::calling("", vec![update_state_call(json!({ "zzz": 1 }))]),
        LlmResponse::text("Sorry, let me retry."),
    ]);
    let runtime = runtime(both_fields_flow(), llm);
    let mut conversation = runtime.start_conversation().unwrap();

    let outcome = conversation.user_turn("hello").await.unwrap();
    assert!(outcome.transition.is_none());
    assert_eq!(conversation.state_value(), &json!({ "a": null, "b": null }));
    let error_fed_back = conversation.messages().iter().any(|m| {
        matches!(m, Message::User(s) if s.contains("unknown state field") && s.contains("zzz"))
    });
    assert!(error_fed_back, "LLM should see the rejection");
}

/// An update that breaks the typed model is reverted.
#[tokio::test]
async fn mistyped_state_update_is_reverted() {
    let llm = MockLlm::scripted(vec![
        LlmResponse::calling("", vec![update_state_call(json!({ "a": 42 }))]),
        LlmResponse::text("Noted."),
    ]);
    let runtime = runtime(both_fields_flow(), llm);
    let mut conversation = runtime.start_conversation().unwrap();

    conversation.user_turn("hello").await.unwrap();
    assert_eq!(conversation.state_value(), &json!({ "a": null, "b": null }));
    let rejected = conversation.messages().iter().any(|m| {
        matches!(m, Message::User(s) if s.contains("state update rejected"))
    });
    assert!(rejected);
}

/// Calling a tool the node does not permit yields an error result, not an abort.
#[tokio::test]
async fn unpermitted_tool_call_yields_error_result() {
    let llm = MockLlm::scripted(vec![
        LlmResponse::calling("", vec![ToolCall::new("hack", "{}")]),
        LlmResponse::text("Understood."),
    ]);
    let runtime = runtime(both_fields_flow(), llm);
    let mut conversation = runtime.start_conversation().unwrap();

    let outcome = conversation.user_turn("hello").await.unwrap();
    assert_eq!(outcome.reply, "Understood.");
    let denied = conversation.messages().iter().any(|m| {
        matches!(m, Message::User(s) if s.contains("tool not available in this step: hack"))
    });
    assert!(denied);
}

/// When two outgoing edges are satisfied after the same turn, the
/// first-declared edge wins.
#[tokio::test]
async fn edge_precedence_first_declared_wins() {
    let mut graph = GraphSchema::new("precedence");
    graph
        .add_node(collect_node())
        .add_node(done_node("preferred"))
        .add_node(done_node("fallback"))
        .add_edge(EdgeSchema::new(
            "collect",
            "preferred",
            |s: &CollectState| s.a.is_some(),
            |s: &CollectState, _: &()| Some(Handoff { a: s.a.clone()? }),
        ))
        .add_edge(EdgeSchema::new(
            "collect",
            "fallback",
            |s: &CollectState| s.a.is_some(),
            |s: &CollectState, _: &()| Some(Handoff { a: s.a.clone()? }),
        ))
        .set_start("collect");
    let flow = graph.compile().expect("valid graph");

    let llm = MockLlm::scripted(vec![
        LlmResponse::calling("", vec![update_state_call(json!({ "a": "x" }))]),
        LlmResponse::text("Done."),
    ]);
    let runtime = runtime(flow, llm);
    let mut conversation = runtime.start_conversation().unwrap();

    let outcome = conversation.user_turn("go").await.unwrap();
    assert_eq!(outcome.transition.unwrap().to, "preferred");
}

/// Entering a node appends its rendered system prompt with the handed-over context.
#[tokio::test]
async fn transition_appends_destination_system_prompt() {
    let llm = MockLlm::scripted(vec![
        LlmResponse::calling("", vec![update_state_call(json!({ "a": "x", "b": "y" }))]),
        LlmResponse::text("Moving on."),
    ]);
    let runtime = runtime(both_fields_flow(), llm);
    let mut conversation = runtime.start_conversation().unwrap();

    conversation.user_turn("both at once").await.unwrap();
    let last_system = conversation
        .messages()
        .iter()
        .rev()
        .find_map(|m| match m {
            Message::System(s) => Some(s.clone()),
            _ => None,
        })
        .expect("system prompt present");
    assert!(last_system.contains("Wrap up."), "{}", last_system);
    assert!(last_system.contains("\"a\": \"x\""), "{}", last_system);
}

/// A start node that declares an input model cannot be started bare.
#[tokio::test]
async fn start_requires_declared_input() {
    let mut graph = GraphSchema::new("needs_input");
    graph.add_node(done_node("only")).set_start("only");
    let flow = graph.compile().expect("valid graph");
    let runtime = WorkflowRuntime::new(
        flow,
        Arc::new(MockLlm::with_reply("hi")),
        Arc::new(MockToolSource::new(vec![])),
    );

    let err = runtime.start_conversation().unwrap_err();
    assert!(err.to_string().contains("requires input"), "{}", err);

    let conversation = runtime
        .start_conversation_with(Handoff { a: "x".into() })
        .expect("typed start");
    assert_eq!(conversation.current_node(), "only");
    assert_eq!(conversation.input_value(), &json!({ "a": "x" }));
}
