use crate::domain::llm_config::Completion;
use serde::Serialize;

/// Result of one agent invocation. Failures are folded into `RawText` so the
/// chat always has something to show.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentResponse {
    RawText { text: String },
    Structured { completion: Completion },
}

impl AgentResponse {
    pub fn raw(text: impl Into<String>) -> Self {
        AgentResponse::RawText { text: text.into() }
    }
}
