use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// JSON envelope shared by every error response: `{"ok": false, "kind": ..., "error": ...}`.
pub fn error_body(kind: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "ok": false,
        "kind": kind,
        "error": message,
    })
}

/// Build an error response with the shared envelope.
pub fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    (status, axum::Json(error_body(kind, message))).into_response()
}

/// Errors raised by the shared HTTP plumbing, before a service handler runs.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::NotFound => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are client errors and already visible in the TraceLayer span; only 500s carry a
        // cause worth logging.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        error_response(status, self.kind(), &self.to_string())
    }
}
