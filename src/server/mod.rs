//! Driver surface — Axum JSON API over the session.
//!
//! The presentation layer (whatever renders the dashboard) drives and
//! observes the engine exclusively through these routes. CORS enabled
//! for local development.

pub mod routes;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use routes::AppState;

/// Start the API server as a background task — it doesn't block.
pub fn spawn_server(state: AppState, port: u16) {
    let app = build_router(state);

    tokio::spawn(async move {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        info!(port, "API server starting on http://localhost:{port}");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind API port");

        axum::serve(listener, app).await.expect("API server error");
    });
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/snapshot", get(routes::get_snapshot))
        .route("/api/recent", get(routes::get_recent))
        .route("/api/stats", get(routes::get_stats))
        .route("/api/start", post(routes::post_start))
        .route("/api/pause", post(routes::post_pause))
        .route("/api/reset", post(routes::post_reset))
        .route("/api/config", post(routes::post_config))
        .route("/api/strategy", post(routes::post_strategy))
        .route("/api/verification", post(routes::post_verification))
        .route("/api/verification/force", post(routes::post_force_verified))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
