use crate::application::use_cases::analysis_service::AnalysisService;
use crate::domain::conversation::{ChatRole, ConversationTurn};
use crate::domain::prompt::TemplateId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

pub const EMPTY_QUESTION_WARNING: &str = "Por favor, digite uma pergunta válida.";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnOutcome {
    Answered { template: TemplateId, reply: String },
    Rejected { warning: String },
}

/// Conversation state owned by one browser session. History only grows.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    history: Vec<ConversationTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn assistant_turns(&self) -> usize {
        self.history
            .iter()
            .filter(|turn| turn.role == ChatRole::Assistant)
            .count()
    }

    /// Runs one turn. Blank questions are rejected before any remote call and
    /// leave the history untouched.
    pub async fn handle_turn(&mut self, service: &AnalysisService, question: &str) -> TurnOutcome {
        let question = question.trim();
        if question.is_empty() {
            warn!(session = %self.id, "Rejected empty question");
            return TurnOutcome::Rejected {
                warning: EMPTY_QUESTION_WARNING.to_string(),
            };
        }

        self.history.push(ConversationTurn::user(question));

        let answer = service.answer(question).await;
        self.history
            .push(ConversationTurn::assistant(answer.reply.clone()));

        info!(
            session = %self.id,
            template = answer.route.template.as_str(),
            turns = self.history.len(),
            "Turn completed"
        );

        TurnOutcome::Answered {
            template: answer.route.template,
            reply: answer.reply,
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::analysis_agent::{AnalysisAgent, ANALYSIS_ERROR_PREFIX};
    use crate::application::use_cases::prompt_router::PromptRouter;
    use crate::domain::dataset::{CellValue, Dataset};
    use crate::domain::llm_config::LLMConfig;
    use crate::domain::variant::DatasetVariant;
    use crate::infrastructure::llm_clients::testing::ScriptedClient;
    use std::sync::Arc;

    fn service(client: Arc<ScriptedClient>) -> AnalysisService {
        let dataset = Dataset::new(
            "memory",
            vec!["departamento".to_string(), "salario".to_string()],
            vec![vec![
                CellValue::Text("RH".to_string()),
                CellValue::Number(5000.0),
            ]],
        );
        AnalysisService::new(
            Arc::new(dataset),
            PromptRouter::for_variant(DatasetVariant::Hr),
            AnalysisAgent::new(client, LLMConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_blank_questions_make_no_remote_call() {
        let client = Arc::new(ScriptedClient::replying("nunca"));
        let service = service(client.clone());
        let mut session = ChatSession::new();

        for question in ["", "   ", "\n\t"] {
            let outcome = session.handle_turn(&service, question).await;
            assert_eq!(
                outcome,
                TurnOutcome::Rejected {
                    warning: EMPTY_QUESTION_WARNING.to_string()
                }
            );
        }

        assert_eq!(client.calls(), 0);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_each_turn_appends_user_then_assistant() {
        let client = Arc::new(ScriptedClient::replying("content='Tudo certo' response_metadata={}"));
        let service = service(client.clone());
        let mut session = ChatSession::new();

        let questions = ["Como está o clima?", "  ", "Qual a média salarial?", "Quem saiu?"];
        for question in questions {
            session.handle_turn(&service, question).await;
        }

        assert_eq!(client.calls(), 3);
        assert_eq!(session.assistant_turns(), 3);
        let roles: Vec<ChatRole> = session.history().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
                ChatRole::Assistant,
            ]
        );
        assert_eq!(session.history()[0].content, "Como está o clima?");
        assert_eq!(session.history()[1].content, "Tudo certo");
        assert!(session
            .history()
            .windows(2)
            .all(|pair| pair[0].created_at <= pair[1].created_at));
    }

    #[tokio::test]
    async fn test_routed_template_is_reported() {
        let client = Arc::new(ScriptedClient::replying("ok"));
        let service = service(client);
        let mut session = ChatSession::new();

        match session.handle_turn(&service, "Qual o NÚMERO de pessoas?").await {
            TurnOutcome::Answered { template, .. } => {
                assert_eq!(template, TemplateId::DataSpecialist)
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remote_error_is_kept_as_assistant_turn() {
        let client = Arc::new(ScriptedClient::failing("quota exceeded"));
        let service = service(client);
        let mut session = ChatSession::new();

        let outcome = session.handle_turn(&service, "Como está a equipe?").await;

        match outcome {
            TurnOutcome::Answered { reply, .. } => {
                assert!(reply.starts_with(ANALYSIS_ERROR_PREFIX));
                assert!(reply.contains("quota exceeded"));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(session.assistant_turns(), 1);
    }
}
