//! System prompt assembly for workflow nodes.
//!
//! Each graph carries one [`SystemTemplate`] (shared background and state
//! guidance); each node contributes its own task text. On entering a node the
//! runtime renders background + task + handed-over context into one System
//! message.

use serde_json::Value;

/// Default instructions for recording progress with the state-update tool.
/// Appended to every rendered node prompt unless overridden on the template.
pub const DEFAULT_STATE_GUIDANCE: &str = "\
As you learn new details relevant to the current task, record them by calling \
the update_state tool. Only record values confirmed by the customer or \
returned by a tool; never invent them. Move on once the task is complete.";

/// Shared system prompt template for all nodes of a graph.
///
/// `background` describes the assistant's overall role and rules; the
/// per-node task text and the context handed over by the incoming edge are
/// filled in by [`render`](Self::render).
#[derive(Debug, Clone)]
pub struct SystemTemplate {
    background: String,
    state_guidance: String,
}

impl SystemTemplate {
    /// Creates a template with the given background and default state guidance.
    pub fn new(background: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            state_guidance: DEFAULT_STATE_GUIDANCE.to_string(),
        }
    }

    /// Replaces the state-recording guidance section (builder).
    pub fn with_state_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.state_guidance = guidance.into();
        self
    }

    /// Renders the full system prompt for one node.
    ///
    /// `input` is the context produced by the incoming edge; `None` for nodes
    /// without an input model (e.g. the start node).
    pub fn render(&self, node_prompt: &str, input: Option<&Value>) -> String {
        let mut out = String::new();
        out.push_str(&self.background);
        out.push_str("\n\n## Current task\n\n");
        out.push_str(node_prompt);
        if let Some(value) = input {
            if !value.is_null() {
                let pretty = serde_json::to_string_pretty(value)
                    .unwrap_or_else(|_| value.to_string());
                out.push_str("\n\n## Details gathered so far\n\n```json\n");
                out.push_str(&pretty);
                out.push_str("\n```");
            }
        }
        out.push_str("\n\n");
        out.push_str(&self.state_guidance);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// **Scenario**: rendered prompt contains background, task, and guidance in order.
    #[test]
    fn render_without_input_has_background_task_guidance() {
        let template = SystemTemplate::new("You are an agent.");
        let prompt = template.render("Do the thing.", None);
        let bg = prompt.find("You are an agent.").unwrap();
        let task = prompt.find("Do the thing.").unwrap();
        let guidance = prompt.find("update_state").unwrap();
        assert!(bg < task && task < guidance, "{}", prompt);
        assert!(!prompt.contains("Details gathered so far"));
    }

    /// **Scenario**: input context is rendered as a JSON block.
    #[test]
    fn render_with_input_includes_json_block() {
        let template = SystemTemplate::new("bg");
        let input = json!({ "user_details": { "user_id": "u1" } });
        let prompt = template.render("task", Some(&input));
        assert!(prompt.contains("Details gathered so far"), "{}", prompt);
        assert!(prompt.contains("\"user_id\": \"u1\""), "{}", prompt);
    }

    /// **Scenario**: a null input (unit model) renders like no input.
    #[test]
    fn render_with_null_input_skips_context_section() {
        let template = SystemTemplate::new("bg");
        let prompt = template.render("task", Some(&Value::Null));
        assert!(!prompt.contains("Details gathered so far"));
    }

    /// **Scenario**: custom state guidance replaces the default section.
    #[test]
    fn custom_state_guidance_is_used() {
        let template = SystemTemplate::new("bg").with_state_guidance("Keep notes.");
        let prompt = template.render("task", None);
        assert!(prompt.contains("Keep notes."));
        assert!(!prompt.contains(DEFAULT_STATE_GUIDANCE));
    }
}
