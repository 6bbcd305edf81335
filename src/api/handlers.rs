//! HTTP API handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ReadinessSource;
use crate::metrics::{DiceMetrics, PROMETHEUS_CONTENT_TYPE};

/// Faces on the die.
pub const DIE_FACES: u8 = 6;

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Successful rolls since start.
    rolls: Arc<AtomicU64>,
    /// Where readiness is read from on every check.
    readiness: ReadinessSource,
    /// Per-instance metrics registry.
    metrics: DiceMetrics,
}

impl AppState {
    /// Create new app state.
    pub fn new(readiness: ReadinessSource) -> Self {
        let state = Self {
            rolls: Arc::new(AtomicU64::new(0)),
            readiness,
            metrics: DiceMetrics::new(),
        };
        state.refresh_readiness();
        state
    }

    /// Set ready state. Ignored when readiness comes from the environment.
    pub fn set_ready(&self, ready: bool) {
        if !self.readiness.set(ready) {
            debug!(ready, "Readiness is environment driven; ignoring set_ready");
        }
    }

    /// Evaluate readiness and publish it to the gauge.
    pub fn refresh_readiness(&self) -> bool {
        let ready = self.readiness.is_ready();
        self.metrics.set_ready(ready);
        ready
    }

    /// Record one roll and return the running total.
    pub fn record_roll(&self) -> u64 {
        self.metrics.inc_dice_rolls();
        self.rolls.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Rolls recorded so far.
    pub fn rolls(&self) -> u64 {
        self.rolls.load(Ordering::SeqCst)
    }

    /// Readiness source in use.
    pub fn readiness(&self) -> &ReadinessSource {
        &self.readiness
    }

    /// Metrics registry.
    pub fn metrics(&self) -> &DiceMetrics {
        &self.metrics
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ReadinessSource::default())
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Status: "ok" or "not-ready".
    pub status: String,
}

/// Dice roll response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiceResponse {
    /// Rolled value in `1..=6`.
    pub dice: u8,
}

/// Roll a fair six-sided die.
pub fn roll_die() -> u8 {
    rand::thread_rng().gen_range(1..=DIE_FACES)
}

/// Health check handler - returns 200 if ready, 500 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.refresh_readiness() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
            }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                status: "not-ready".to_string(),
            }),
        )
    }
}

/// Dice handler - rolls once and counts it.
pub async fn dice(State(state): State<AppState>) -> impl IntoResponse {
    let value = roll_die();
    let total = state.record_roll();
    info!(total, "Rolled dice: {}", value);

    Json(DiceResponse { dice: value })
}

/// Metrics handler - always 200, readiness gauge refreshed first.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.refresh_readiness();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}
