use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::interfaces::http::start_server;

pub async fn run() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let state = crate::infrastructure::bootstrap::setup().map_err(|err| {
        error!(error = %err, "Startup aborted");
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    })?;

    info!(
        host = %state.config.host,
        port = state.config.port,
        title = state.overview.title,
        "Serving dashboard API"
    );

    start_server(state)?.await
}
