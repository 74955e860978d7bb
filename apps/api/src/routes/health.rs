//! Health check HTTP route handlers
//!
//! Provides endpoints for checking the health of the API and its database:
//! - `GET /health` - Health check including a database probe
//! - `GET /health/live` - Kubernetes-style liveness probe

use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

/// Status of the API or one of its dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    /// Overall status; healthy only if the database answered
    pub status: ServiceStatus,
    /// Database probe result
    pub database: ServiceStatus,
    /// Database probe round trip in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// API version
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Shared state for health check handlers
#[derive(Clone)]
pub struct HealthState {
    pub pool: SqlitePool,
}

impl HealthState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Create health check router
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness_probe))
        .with_state(state)
}

/// Liveness probe for Kubernetes
///
/// Returns 200 if the server process is running and can handle requests.
/// This should NOT check the database - that's what `/health` is for.
async fn liveness_probe() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check with a `SELECT 1` database probe
///
/// # Response
/// - 200 OK if the database answered
/// - 503 Service Unavailable otherwise
async fn health_check(State(state): State<HealthState>) -> impl IntoResponse {
    let start = Instant::now();

    let probe = tokio::time::timeout(
        Duration::from_secs(5),
        sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.pool),
    )
    .await;

    let (database, response_time_ms) = match probe {
        Ok(Ok(_)) => (
            ServiceStatus::Healthy,
            Some(start.elapsed().as_millis() as u64),
        ),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database health check failed");
            (ServiceStatus::Unhealthy, None)
        }
        Err(_) => {
            tracing::error!("Database health check timed out");
            (ServiceStatus::Unhealthy, None)
        }
    };

    let response = HealthCheckResponse {
        status: database,
        database,
        response_time_ms,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    };

    let status_code = if response.status == ServiceStatus::Healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
