use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{Completion, LLMConfig};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-process client that records prompts and answers from a fixed script.
pub struct ScriptedClient {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LLMClient for ScriptedClient {
    async fn generate(&self, config: &LLMConfig, _system: &str, user: &str) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(user.to_string());
        match &self.reply {
            Ok(text) => Ok(Completion {
                content: text.clone(),
                model: Some(config.model.clone()),
                stop_reason: Some("end_turn".to_string()),
                input_tokens: None,
                output_tokens: None,
            }),
            Err(message) => Err(AppError::LLMError(message.clone())),
        }
    }
}
