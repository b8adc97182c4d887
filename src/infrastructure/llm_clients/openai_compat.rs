use super::{join_url, LLMClient};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{Completion, LLMConfig};
use async_trait::async_trait;
use serde_json::json;

/// Chat-completions client for OpenAI, OpenRouter and local servers that
/// mimic them.
pub struct OpenAICompatClient {
    client: reqwest::Client,
}

impl OpenAICompatClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LLMClient for OpenAICompatClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<Completion> {
        let url = join_url(&config.base_url, "chat/completions");

        let mut messages = Vec::new();
        if !system.trim().is_empty() {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": user }));

        let body = json!({
            "model": config.model,
            "messages": messages,
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::LLMError("Invalid response format".to_string()))?;

        Ok(Completion {
            content,
            model: json["model"].as_str().map(|s| s.to_string()),
            stop_reason: json["choices"][0]["finish_reason"]
                .as_str()
                .map(|s| s.to_string()),
            input_tokens: json["usage"]["prompt_tokens"].as_u64().map(|n| n as u32),
            output_tokens: json["usage"]["completion_tokens"]
                .as_u64()
                .map(|n| n as u32),
        })
    }
}
