pub mod handlers;
pub mod types;

use crate::{
    Error, Result,
    cases::CaseStore,
    config::{Config, ServerConfig},
    runpod::{InferenceClient, RunpodClient},
    upload::UploadPolicy,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Room left for multipart boundaries and the text fields around the image.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_state(config: &Config) -> Result<AppState> {
    let inference = RunpodClient::from_config(&config.runpod)?
        .map(|client| Arc::new(client) as Arc<dyn InferenceClient>);

    Ok(AppState {
        cases: Arc::new(CaseStore::new()),
        inference,
        upload: Arc::new(UploadPolicy::new(&config.upload)),
    })
}

pub fn router(state: AppState, server: &ServerConfig) -> Result<Router> {
    let body_limit = state.upload.max_file_bytes() + MULTIPART_OVERHEAD_BYTES;

    Ok(Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/chat", post(handlers::chat))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&server.cors_allowed_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| Error::config(format!("Invalid CORS origin: '{}'", origin)))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config)?;
    let app = router(state, &config.server)?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!(
        "Starting server on {} (runpod mode: {:?})",
        addr, config.runpod.mode
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
