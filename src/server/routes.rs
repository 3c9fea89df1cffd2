//! API route handlers.
//!
//! All endpoints return JSON. The session is shared behind
//! `Arc<RwLock<Session>>`; handlers hold the write lock for the whole
//! operation, so overrides never interleave with an in-flight tick.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};
use tracing::info;

use crate::config::SessionConfig;
use crate::engine::verification::VERIFY_TARGET;
use crate::engine::Session;
use crate::types::{RoundOutcome, Snapshot};

/// Shared state behind every handler: the session itself plus a wakeup
/// for the tick loop, which parks without a timer while paused.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub wake: Arc<Notify>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            wake: Arc::new(Notify::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StrategyToggle {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct VerificationOverride {
    pub count: u8,
}

#[derive(Debug, Deserialize)]
pub struct ForceVerified {
    pub verified: bool,
}

/// Per-outcome tallies for charting.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub player: u64,
    pub banker: u64,
    pub ties: u64,
    pub wins: u64,
    pub losses: u64,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/snapshot
pub async fn get_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.session.read().await.snapshot())
}

/// GET /api/recent
pub async fn get_recent(State(state): State<AppState>) -> Json<Vec<RoundOutcome>> {
    Json(state.session.read().await.recent_results().copied().collect())
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let snap = state.session.read().await.snapshot();
    Json(StatsResponse {
        player: snap.player_wins,
        banker: snap.banker_wins,
        ties: snap.ties,
        wins: snap.wins,
        losses: snap.losses,
    })
}

/// POST /api/start
pub async fn post_start(State(state): State<AppState>) -> StatusCode {
    state.session.write().await.start();
    // Re-arm the tick loop; it holds no timer while paused.
    state.wake.notify_one();
    info!("Session started");
    StatusCode::OK
}

/// POST /api/pause
pub async fn post_pause(State(state): State<AppState>) -> StatusCode {
    state.session.write().await.pause();
    info!("Session paused");
    StatusCode::OK
}

/// POST /api/reset
pub async fn post_reset(State(state): State<AppState>) -> StatusCode {
    state.session.write().await.reset();
    info!("Session reset");
    StatusCode::OK
}

/// POST /api/config — validated replacement; applying resets the session.
pub async fn post_config(
    State(state): State<AppState>,
    Json(config): Json<SessionConfig>,
) -> Result<StatusCode, (StatusCode, String)> {
    config
        .validate()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    info!(?config, "Applying new session config");
    state.session.write().await.apply_config(config);
    Ok(StatusCode::OK)
}

/// POST /api/strategy
pub async fn post_strategy(
    State(state): State<AppState>,
    Json(body): Json<StrategyToggle>,
) -> StatusCode {
    state.session.write().await.set_strategy_enabled(body.enabled);
    info!(enabled = body.enabled, "Strategy toggled");
    StatusCode::OK
}

/// POST /api/verification
pub async fn post_verification(
    State(state): State<AppState>,
    Json(body): Json<VerificationOverride>,
) -> Result<StatusCode, (StatusCode, String)> {
    if body.count > VERIFY_TARGET {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("count must be 0..={VERIFY_TARGET}, got {}", body.count),
        ));
    }
    state.session.write().await.override_verification(body.count);
    Ok(StatusCode::OK)
}

/// POST /api/verification/force
pub async fn post_force_verified(
    State(state): State<AppState>,
    Json(body): Json<ForceVerified>,
) -> StatusCode {
    state.session.write().await.force_verified(body.verified);
    StatusCode::OK
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
