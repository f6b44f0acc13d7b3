//! Probe and scrape endpoints
//!
//! - /health - process is up, reports the build version
//! - /health/live - liveness probe, never touches dependencies
//! - /health/ready - readiness probe, 503 until the database answers
//! - /metrics - Prometheus text exposition

use crate::{db, state::AppState};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

/// Probe response body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseStatus>,
}

/// Result of the database round trip
#[derive(Debug, Serialize)]
pub struct DatabaseStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    fn plain(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database: None,
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::plain("healthy"))
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::plain("alive"))
}

/// Ready once `SELECT 1` succeeds on the pool
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match db::health_check(state.db()).await {
        Ok(()) => DatabaseStatus {
            available: true,
            error: None,
        },
        Err(e) => DatabaseStatus {
            available: false,
            error: Some(e.to_string()),
        },
    };

    let (code, status) = if database.available {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database: Some(database),
        }),
    )
}

/// Render the Prometheus registry, 404 when no recorder is installed
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "metrics recorder not installed".to_string(),
        ),
    }
}
