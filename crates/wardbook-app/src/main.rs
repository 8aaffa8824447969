#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wardbook_app::{
    build_router, load_local_session, reconcile_session, spawn_session_listener, AppConfig,
    AppState, SessionFile,
};
use wardbook_service::HttpRecordsService;

fn env_str(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn config_from_env() -> AppConfig {
    let defaults = AppConfig::default();
    AppConfig {
        bind_addr: env_str("WARDBOOK_BIND", defaults.bind_addr),
        service_url: env_str("WARDBOOK_SERVICE_URL", defaults.service_url),
        service_key: env_str("WARDBOOK_SERVICE_KEY", defaults.service_key),
        session_file: env::var("WARDBOOK_SESSION_FILE")
            .map(Into::into)
            .unwrap_or(defaults.session_file),
        http_timeout: Duration::from_millis(env_u64(
            "WARDBOOK_HTTP_TIMEOUT_MS",
            defaults.http_timeout.as_millis() as u64,
        )),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config_from_env();
    let service = match HttpRecordsService::new(
        config.service_url.clone(),
        config.service_key.clone(),
        config.http_timeout,
    ) {
        Ok(service) => Arc::new(service),
        Err(err) => {
            error!(error = %err, "service client construction failed");
            std::process::exit(1);
        }
    };
    let session_file = SessionFile::new(config.session_file.clone());
    let state = AppState::with_config(service, session_file, config);

    // The local session read lands before the first route decision; remote
    // reconciliation runs alongside serving, with the guard answering
    // `loading` until it resolves.
    load_local_session(&state).await;
    let _session_listener = spawn_session_listener(&state);
    tokio::spawn({
        let state = state.clone();
        async move { reconcile_session(&state).await }
    });

    let listener = match TcpListener::bind(&state.config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(addr = %state.config.bind_addr, error = %err, "bind failed");
            std::process::exit(1);
        }
    };
    info!(addr = %state.config.bind_addr, "wardbook console serving");
    if let Err(err) = axum::serve(listener, build_router(state)).await {
        error!(error = %err, "server exited with error");
    }
}
