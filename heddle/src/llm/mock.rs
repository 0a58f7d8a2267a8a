//! Mock LLM for tests and examples.
//!
//! Plays back a scripted sequence of responses, one per `invoke` call; once
//! the script is exhausted it returns a fixed fallback reply with no tool
//! calls. Walking a multi-node workflow takes several rounds per turn, so the
//! script is a queue rather than a single canned answer.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::FlowError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;
use crate::tool_source::ToolSpec;

/// Scripted LLM: returns queued responses in order, then a fallback.
///
/// Build the script with [`LlmResponse::text`] and [`LlmResponse::calling`].
/// The fallback ends any turn cleanly (no tool calls), so an exhausted script
/// never wedges the runtime's tool loop.
pub struct MockLlm {
    script: Mutex<VecDeque<LlmResponse>>,
    fallback: String,
}

impl MockLlm {
    /// Creates a mock that answers every call with the same text and no tool calls.
    pub fn with_reply(content: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: content.into(),
        }
    }

    /// Creates a mock that plays back `responses` in order.
    pub fn scripted(responses: Vec<LlmResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            fallback: "I have nothing further to add.".to_string(),
        }
    }

    /// Sets the reply used after the script is exhausted (builder).
    pub fn with_fallback(mut self, content: impl Into<String>) -> Self {
        self.fallback = content.into();
        self
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        _messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<LlmResponse, FlowError> {
        let next = self
            .script
            .lock()
            .map_err(|_| FlowError::ExecutionFailed("mock llm script poisoned".to_string()))?
            .pop_front();
        Ok(next.unwrap_or_else(|| LlmResponse::text(self.fallback.clone())))
    }
}
