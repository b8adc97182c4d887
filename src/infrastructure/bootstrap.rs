use std::error::Error;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use crate::application::use_cases::analysis_agent::AnalysisAgent;
use crate::application::use_cases::prompt_router::PromptRouter;
use crate::application::{AnalysisService, DatasetOverview, VisualizationBuilder};
use crate::domain::dataset::Dataset;
use crate::infrastructure::config::{AppConfig, ConfigService};
use crate::infrastructure::llm_clients::{LLMClient, RouterClient};
use crate::infrastructure::spreadsheet::load_dataset;
use crate::interfaces::http::{add_log, AppState, LogEntry, SessionStore};

/// Loads configuration and the dataset, then wires the shared state.
/// Any failure here aborts startup.
pub fn setup() -> Result<Arc<AppState>, Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));

    let config = ConfigService::new().load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        err
    })?;

    let dataset = load_checked_dataset(&config).map_err(|err| {
        error!(
            error = %err,
            dataset = %config.dataset_path().display(),
            "Failed to load dataset"
        );
        err
    })?;

    add_log(
        &logs,
        "INFO",
        "Dataset",
        &format!(
            "Loaded {} records from {}",
            dataset.len(),
            dataset.source()
        ),
    );

    Ok(Arc::new(build_state(config, dataset, logs)))
}

fn load_checked_dataset(config: &AppConfig) -> crate::domain::error::Result<Dataset> {
    let dataset = load_dataset(&config.dataset_path())?;
    dataset.require_columns(config.variant.required_columns())?;
    if dataset.is_empty() {
        warn!(source = dataset.source(), "Dataset has a header but no rows");
    }
    Ok(dataset)
}

fn build_state(config: AppConfig, dataset: Dataset, logs: Arc<Mutex<Vec<LogEntry>>>) -> AppState {
    let variant = config.variant;
    let dataset = Arc::new(dataset);

    let dashboard = VisualizationBuilder::new(variant).build(&dataset);
    for warning in &dashboard.warnings {
        add_log(&logs, "WARN", "Visualization", warning);
    }

    let overview = DatasetOverview::build(variant, &dataset);

    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new());
    let agent = AnalysisAgent::new(llm_client, config.llm.clone());
    let service = AnalysisService::new(dataset, PromptRouter::for_variant(variant), agent);

    info!(
        variant = variant.as_str(),
        provider = config.llm.provider.as_str(),
        model = %config.llm.model,
        charts = dashboard.charts.len(),
        "Application state ready"
    );

    AppState {
        config,
        service: Arc::new(service),
        dashboard,
        overview,
        sessions: SessionStore::new(),
        logs,
    }
}
