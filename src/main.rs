use std::{process::ExitCode, sync::Arc};

use api_bridge_mcp::{
    bridge::executor::ReqwestExecutor, build_health_app, config::Config, logging,
    mcp::stdio::serve_stdio, AppState,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment alone may be complete.
    dotenvy::dotenv().ok();
    logging::init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return Ok(ExitCode::FAILURE);
        }
    };

    let health_socket = config.health_socket();
    let executor = Arc::new(ReqwestExecutor::new()?);
    let state = AppState::new(config, executor);

    let listener = tokio::net::TcpListener::bind(health_socket).await?;
    info!(
        bind_addr = %health_socket,
        "health check server listening"
    );
    let health_server = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, build_health_app().into_make_service()).await {
            error!(error = %err, "health listener stopped");
        }
    });

    info!(
        server = %state.config.server_name,
        version = %state.config.server_version,
        base_url = %state.config.base_url,
        "mcp server running on stdio"
    );

    tokio::select! {
        result = serve_stdio(state) => {
            result?;
            info!("stdin closed, shutting down");
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            warn!("interrupt received, shutting down");
        }
    }

    health_server.abort();
    Ok(ExitCode::SUCCESS)
}
