pub mod use_cases;

pub use use_cases::analysis_service::AnalysisService;
pub use use_cases::chat_session::ChatSession;
pub use use_cases::overview::DatasetOverview;
pub use use_cases::visualization::VisualizationBuilder;
