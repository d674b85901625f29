use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use onboard_core::error::error_response;

/// Signup service error variants.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Code not found. Please request a new code.")]
    CodeNotFound,
    #[error("That code has already been used. Please request a new one.")]
    CodeAlreadyUsed,
    #[error("That code has expired. Please request a new code.")]
    CodeExpired,
    #[error("Incorrect code. Please try again.")]
    IncorrectCode,
    #[error("Company not found for that company code.")]
    CompanyNotFound,
    #[error(
        "We couldn't find your details under this company yet. Please ask your company admin to add you as an employee, then try again."
    )]
    EmployeeNotOnRoster,
    #[error("This email is already registered. Please log in instead.")]
    EmailAlreadyRegistered,
    #[error("{context} failed: {body}")]
    Upstream {
        context: &'static str,
        status: u16,
        body: String,
    },
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl SignupError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::CodeNotFound => "CODE_NOT_FOUND",
            Self::CodeAlreadyUsed => "CODE_ALREADY_USED",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::IncorrectCode => "INCORRECT_CODE",
            Self::CompanyNotFound => "COMPANY_NOT_FOUND",
            Self::EmployeeNotOnRoster => "EMPLOYEE_NOT_ON_ROSTER",
            Self::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            Self::Upstream { .. } => "UPSTREAM",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_)
            | Self::CodeNotFound
            | Self::CodeAlreadyUsed
            | Self::CodeExpired
            | Self::IncorrectCode
            | Self::CompanyNotFound
            | Self::EmployeeNotOnRoster => StatusCode::BAD_REQUEST,
            Self::EmailAlreadyRegistered => StatusCode::CONFLICT,
            Self::Upstream { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        // Only 500s are logged here; TraceLayer already records every request's status.
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
            }
            Self::Upstream {
                context, status, ..
            } => {
                tracing::error!(
                    context = *context,
                    upstream_status = *status,
                    kind = "UPSTREAM",
                    "upstream call failed"
                );
            }
            _ => {}
        }
        error_response(self.status(), self.kind(), &self.to_string())
    }
}
