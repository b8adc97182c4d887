pub mod analysis;
pub mod chart;
pub mod conversation;
pub mod dataset;
pub mod error;
pub mod llm_config;
pub mod prompt;
pub mod variant;
