//! Server setup and configuration.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api;
use crate::health;
use crate::state::AppState;

/// Build the summarization service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/summarize", post(api::summarize))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server on the given address.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);

    tracing::info!("summarization server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
