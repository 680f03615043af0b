use anyhow::Result;
use axum::{routing::get, Extension, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::info;

use chat_relay_server::config::Settings;
use chat_relay_server::handlers;
use chat_relay_server::services::conversation::SessionRegistry;
use chat_relay_server::services::{GeminiService, RelayService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,chat_relay_server=debug".to_string()),
        )
        .with_target(true)
        .json()
        .init();

    info!("🚀 Starting chat relay server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("✅ Configuration loaded");

    // Initialize services
    let gemini_service = Arc::new(GeminiService::new(settings.gemini.clone()));
    let relay_service = Arc::new(RelayService::new(gemini_service, settings.chat.clone()));
    let registry = SessionRegistry::new();

    // Build router
    let app = build_router(relay_service, registry);

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(relay_service: Arc<RelayService>, registry: SessionRegistry) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .route("/health/stats", get(handlers::health::stats_check))
        .route("/ws", get(handlers::ws::ws_handler))
        // Shared state
        .layer(Extension(relay_service))
        .layer(Extension(registry))
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
}
