use crate::application::use_cases::analysis_agent::AnalysisAgent;
use crate::application::use_cases::prompt_router::{PromptRouter, RouteDecision};
use crate::application::use_cases::prompt_templates;
use crate::domain::dataset::Dataset;
use crate::infrastructure::response::format_agent_response;
use std::sync::Arc;
use tracing::debug;

/// Everything a chat turn needs besides the session itself: the dataset
/// snapshot, the router and the agent.
pub struct AnalysisService {
    dataset: Arc<Dataset>,
    router: PromptRouter,
    agent: AnalysisAgent,
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub route: RouteDecision,
    pub reply: String,
}

impl AnalysisService {
    pub fn new(dataset: Arc<Dataset>, router: PromptRouter, agent: AnalysisAgent) -> Self {
        Self {
            dataset,
            router,
            agent,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn router(&self) -> &PromptRouter {
        &self.router
    }

    /// Route, call the model and clean the output for display.
    pub async fn answer(&self, question: &str) -> Answer {
        let route = self.router.route(question);
        debug!(template = route.template.as_str(), matched = ?route.matched, "Query routed");

        let template = prompt_templates::template(route.template);
        let response = self.agent.invoke(template, &self.dataset, question).await;

        Answer {
            route,
            reply: format_agent_response(&response),
        }
    }
}
