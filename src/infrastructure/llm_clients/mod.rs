pub mod anthropic;
pub mod openai_compat;
#[cfg(test)]
pub mod testing;

use crate::domain::error::Result;
use crate::domain::llm_config::{Completion, LLMConfig, LLMProvider};
use anthropic::AnthropicClient;
use async_trait::async_trait;
use openai_compat::OpenAICompatClient;

#[async_trait]
pub trait LLMClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<Completion>;
}

pub struct RouterClient {
    anthropic: AnthropicClient,
    openai: OpenAICompatClient,
}

impl RouterClient {
    pub fn new() -> Self {
        Self {
            anthropic: AnthropicClient::new(),
            openai: OpenAICompatClient::new(),
        }
    }
}

#[async_trait]
impl LLMClient for RouterClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<Completion> {
        match config.provider {
            LLMProvider::Anthropic => self.anthropic.generate(config, system, user).await,
            LLMProvider::OpenAI => self.openai.generate(config, system, user).await,
        }
    }
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url, path)
    } else {
        format!("{}/{}", base_url, path)
    }
}
