//! HTTP API over the recommendation engine.
//!
//! ## URL layout
//!
//! ```text
//! GET /health
//! GET /products/{id}
//! GET /recommend/user/{id}?k=5
//! GET /recommend/similar/{id}?k=5
//! GET /search?q=...&k=10
//! ```

mod handlers;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::intelligence::RecommendationEngine;

/// Router state injected into every handler.
#[derive(Clone, Copy)]
pub struct ApiState {
    pub engine: &'static RecommendationEngine,
}

pub fn build_router(state: ApiState, cors: bool) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/products/{id}", get(handlers::get_product))
        .route("/recommend/user/{id}", get(handlers::recommend_user))
        .route("/recommend/similar/{id}", get(handlers::recommend_similar))
        .route("/search", get(handlers::search))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Bind and serve until Ctrl-C.
pub async fn serve(engine: &'static RecommendationEngine, bind: &str, cors: bool) -> std::io::Result<()> {
    let router = build_router(ApiState { engine }, cors);
    let listener = TcpListener::bind(bind).await?;
    tracing::info!(bind = %bind, cors = cors, "Recommendation API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Recommendation API shut down");
    Ok(())
}

/// Resolves on Ctrl-C.
pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C, shutdown signal disabled");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
