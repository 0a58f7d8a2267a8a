//! Message types for the conversation history.
//!
//! Message roles: System (node system prompts), User, Assistant. Tool results
//! are folded into the history as user-role text by the runtime, so there is
//! no separate Tool role.

/// A single message in the conversation.
///
/// Roles: system prompt, user input, assistant reply. Node transitions append
/// a fresh System message for the destination node.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Message {
    /// System prompt; the active node's rendered prompt is the last System entry.
    System(String),
    /// User input, or a tool result rendered as user-visible text.
    User(String),
    /// Model reply.
    Assistant(String),
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: system/user/assistant constructors produce the correct variant with content.
    #[test]
    fn message_constructors_produce_expected_variants() {
        let sys = Message::system("s");
        assert!(matches!(&sys, Message::System(c) if c == "s"));
        let usr = Message::user("u");
        assert!(matches!(&usr, Message::User(c) if c == "u"));
        let ast = Message::assistant("a");
        assert!(matches!(&ast, Message::Assistant(c) if c == "a"));
    }

    /// **Scenario**: Each Message variant round-trips through serde.
    #[test]
    fn message_serde_roundtrip() {
        for msg in [
            Message::system("sys"),
            Message::user("usr"),
            Message::assistant("ast"),
        ] {
            let json = serde_json::to_string(&msg).expect("serialize");
            let back: Message = serde_json::from_str(&json).expect("deserialize");
            match (&msg, &back) {
                (Message::System(a), Message::System(b)) => assert_eq!(a, b),
                (Message::User(a), Message::User(b)) => assert_eq!(a, b),
                (Message::Assistant(a), Message::Assistant(b)) => assert_eq!(a, b),
                _ => panic!("variant mismatch: {:?} vs {:?}", msg, back),
            }
        }
    }
}
