//! Health check handlers and response types.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;
use vidkit_core::{AppError, MediaKind};
use vidkit_infra::ErrorResponse;
use vidkit_storage::keys::media_key;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const PROBE_ID: &str = "readiness-probe";

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    /// "healthy", "timeout" or "degraded: {error}"
    pub storage: String,
}

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Server is running", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Readiness probe - storage reachable with the restricted credential.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Storage reachable", body = ReadinessResponse),
        (status = 503, description = "Storage probe failed", body = ReadinessResponse),
        (status = 500, description = "Restricted credential not configured", body = ErrorResponse)
    )
)]
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let storage = state.restricted_storage.clone().ok_or_else(|| {
        AppError::Configuration("SUPABASE_ANON_KEY not configured".to_string())
    })?;

    let bucket = state.bucket().to_string();
    let key = media_key(MediaKind::Video, PROBE_ID);
    let storage_status = run_check(
        PROBE_TIMEOUT,
        async move { storage.exists(&bucket, &key).await.map(drop) },
        "degraded",
    )
    .await;

    let ready = storage_status == "healthy";
    if !ready {
        tracing::warn!(storage = %storage_status, "Readiness probe failed");
    }

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    Ok((
        status_code,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            storage: storage_status,
        }),
    ))
}
