mod config;
mod gateway;
mod pages;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Optional `.env` for local runs; real env vars win.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let backend = match gateway::RestGateway::new(&config.backend_url, config.timeouts) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!(error = %e, backend_url = %config.backend_url, "backend gateway init failed");
            std::process::exit(1);
        }
    };
    tracing::info!(backend_url = %config.backend_url, "backend gateway initialized");

    let port = config.port;
    let idle = Duration::from_secs(config.session_idle_secs);
    let state = state::AppState::new(config, Arc::new(backend));

    // Spawn background session sweeper.
    let _sweeper = state::session::spawn_session_sweeper(state.sessions.clone(), idle);

    let app = routes::app(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %port, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(%port, "bookdesk listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
