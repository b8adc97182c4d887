use crate::domain::analysis::AgentResponse;
use crate::domain::dataset::Dataset;
use crate::domain::llm_config::LLMConfig;
use crate::domain::prompt::PromptTemplate;
use crate::infrastructure::llm_clients::LLMClient;
use crate::shared::TokenCounter;
use std::sync::Arc;
use tracing::{info, warn};

pub const ANALYSIS_ERROR_PREFIX: &str = "Erro ao processar a análise";

/// Context window of the hosted models this service targets.
const CONTEXT_WINDOW_TOKENS: usize = 200_000;

/// Binds a template to the shared completion endpoint configuration.
pub struct AnalysisAgent {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
}

impl AnalysisAgent {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, config: LLMConfig) -> Self {
        Self { llm_client, config }
    }

    /// Sends one completion request carrying the full dataset dump.
    ///
    /// Never fails: a remote error becomes a `RawText` reply describing it.
    pub async fn invoke(
        &self,
        template: &PromptTemplate,
        dataset: &Dataset,
        question: &str,
    ) -> AgentResponse {
        let available_data = dataset.to_text();
        let prompt = template.render(&available_data, question);
        let estimated_tokens = TokenCounter::estimate_tokens(&prompt);

        info!(
            template = template.id.as_str(),
            provider = self.config.provider.as_str(),
            model = %self.config.model,
            payload_chars = prompt.len(),
            estimated_tokens,
            "Invoking analysis agent"
        );

        let reserved = self.config.max_tokens.unwrap_or(0) as usize;
        if !TokenCounter::fits_in_context(estimated_tokens, CONTEXT_WINDOW_TOKENS, reserved) {
            warn!(
                estimated_tokens,
                context_window = CONTEXT_WINDOW_TOKENS,
                "Prompt likely exceeds the model context window"
            );
        }

        match self.llm_client.generate(&self.config, "", &prompt).await {
            Ok(completion) => {
                info!(
                    template = template.id.as_str(),
                    stop_reason = completion.stop_reason.as_deref().unwrap_or("unknown"),
                    output_tokens = completion.output_tokens.unwrap_or(0),
                    "Analysis completed"
                );
                AgentResponse::Structured { completion }
            }
            Err(err) => {
                warn!(template = template.id.as_str(), error = %err, "Analysis failed");
                AgentResponse::raw(format!("{}: {}", ANALYSIS_ERROR_PREFIX, err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::prompt_templates::{DATA_SPECIALIST, HR_SPECIALIST};
    use crate::domain::dataset::CellValue;
    use crate::infrastructure::llm_clients::testing::ScriptedClient;

    fn dataset() -> Dataset {
        Dataset::new(
            "memory",
            vec!["departamento".to_string(), "salario".to_string()],
            vec![vec![
                CellValue::Text("TI".to_string()),
                CellValue::Number(9000.0),
            ]],
        )
    }

    #[tokio::test]
    async fn test_prompt_carries_dataset_and_question() {
        let client = Arc::new(ScriptedClient::replying("ok"));
        let agent = AnalysisAgent::new(client.clone(), LLMConfig::default());

        let response = agent
            .invoke(&DATA_SPECIALIST, &dataset(), "Qual a média salarial?")
            .await;

        assert!(matches!(response, AgentResponse::Structured { .. }));
        assert_eq!(client.calls(), 1);
        let prompt = client.last_prompt().unwrap();
        assert!(prompt.starts_with("Como analista de dados de RH"));
        assert!(prompt.contains("departamento  salario"));
        assert!(prompt.contains("Pergunta: Qual a média salarial?"));
    }

    #[tokio::test]
    async fn test_remote_failure_becomes_text() {
        let client = Arc::new(ScriptedClient::failing("API error (401 Unauthorized)"));
        let agent = AnalysisAgent::new(client.clone(), LLMConfig::default());

        let response = agent.invoke(&HR_SPECIALIST, &dataset(), "clima?").await;

        match response {
            AgentResponse::RawText { text } => {
                assert!(text.starts_with(ANALYSIS_ERROR_PREFIX));
                assert!(text.contains("401 Unauthorized"));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(client.calls(), 1);
    }
}
