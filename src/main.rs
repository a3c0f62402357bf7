use std::sync::Arc;

use systemd_dashboard::{
    build_app,
    config::Config,
    logging,
    systemd_client::{report_tool_availability, CliSystemdClient},
    AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    report_tool_availability();

    let provider = Arc::new(CliSystemdClient::new());
    let bind_socket = config.bind_socket()?;
    let state = AppState::new(provider, config.default_journal_limit);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "dashboard server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
