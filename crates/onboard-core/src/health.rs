use axum::http::StatusCode;

use crate::error::AppError;

/// `GET /healthz`: liveness.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: readiness. The service holds no connections of its own,
/// so readiness equals liveness.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}

/// Router fallback: unknown paths get the JSON error envelope.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
