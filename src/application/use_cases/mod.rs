pub mod analysis_agent;
pub mod analysis_service;
pub mod chat_session;
pub mod coercion;
pub mod overview;
pub mod prompt_router;
pub mod prompt_templates;
pub mod visualization;
