use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use onboard_core::extract::JsonBody;
use onboard_domain::naming::{normalize_company_code, normalize_email};

use crate::error::SignupError;
use crate::handlers::{non_blank, parse_purpose, trimmed};
use crate::state::AppState;
use crate::usecase::send_code::{IssueCodeInput, IssueCodeUseCase};

#[derive(Debug, Default, Deserialize)]
pub struct SendCodeRequest {
    pub email: Option<String>,
    pub purpose: Option<String>,
    pub company_code: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendCodeResponse {
    pub ok: bool,
}

pub async fn send_code(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SendCodeRequest>,
) -> Result<Json<SendCodeResponse>, SignupError> {
    let input = IssueCodeInput {
        email: normalize_email(&trimmed(body.email)),
        purpose: parse_purpose(body.purpose.as_deref())?,
        company_code: non_blank(body.company_code).map(|c| normalize_company_code(&c)),
        full_name: non_blank(body.full_name),
    };
    let usecase = IssueCodeUseCase {
        codes: state.signup_code_repo(),
        mailer: state.email_sender(),
        salt: state.code_salt.clone(),
    };
    usecase.execute(input).await?;
    Ok(Json(SendCodeResponse { ok: true }))
}
