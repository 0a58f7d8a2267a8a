//! Mock ToolSource for tests and examples.
//!
//! Lists a fixed spec set; returns queued results per tool name, falling back
//! to a default text. A conversation that calls several distinct tools can
//! script each one independently.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// Mock tool source: fixed specs, scripted per-tool results.
///
/// `call_tool` pops the next queued result for the tool name; when the queue
/// is empty (or the tool was never scripted) the default result is returned.
/// Arguments are ignored.
pub struct MockToolSource {
    specs: Vec<ToolSpec>,
    results: Mutex<HashMap<String, VecDeque<String>>>,
    default_result: String,
}

impl MockToolSource {
    /// Creates a mock listing the given specs, with `{}` as the default result.
    pub fn new(specs: Vec<ToolSpec>) -> Self {
        Self {
            specs,
            results: Mutex::new(HashMap::new()),
            default_result: "{}".to_string(),
        }
    }

    /// Queues a result for one tool name (builder; call repeatedly for multiple rounds).
    pub fn with_result(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        if let Ok(mut results) = self.results.lock() {
            results.entry(name.into()).or_default().push_back(text.into());
        }
        self
    }

    /// Sets the text returned when no queued result exists (builder).
    pub fn with_default_result(mut self, text: impl Into<String>) -> Self {
        self.default_result = text.into();
        self
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.specs.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        _arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let mut results = self
            .results
            .lock()
            .map_err(|_| ToolSourceError::Transport("mock results poisoned".to_string()))?;
        let text = results
            .get_mut(name)
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| self.default_result.clone());
        Ok(ToolCallContent { text })
    }
}
