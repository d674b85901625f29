use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use onboard_core::extract::JsonBody;
use onboard_domain::id::{CompanyId, UserId};
use onboard_domain::naming::{normalize_company_code, normalize_email};

use crate::error::SignupError;
use crate::handlers::{lenient_string, non_blank, trimmed};
use crate::state::AppState;
use crate::usecase::code::is_well_formed;
use crate::usecase::redeem::{EmployeeSignup, Provisioning, RedeemCodeUseCase, RedeemInput};

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeLinkRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    pub company_code: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmployeeLinkResponse {
    pub ok: bool,
    pub user_id: UserId,
    pub company_id: CompanyId,
}

impl EmployeeLinkRequest {
    /// Unlike verify-code, both the company code and the name must be in the request.
    fn into_input(self) -> Result<RedeemInput, SignupError> {
        let email = normalize_email(&trimmed(self.email));
        if email.is_empty() {
            return Err(SignupError::invalid("Missing email"));
        }
        let code = trimmed(self.code);
        if !is_well_formed(&code) {
            return Err(SignupError::invalid("Missing 6-digit code"));
        }
        let company_code = non_blank(self.company_code)
            .map(|c| normalize_company_code(&c))
            .ok_or_else(|| SignupError::invalid("Missing company_code"))?;
        let full_name =
            non_blank(self.full_name).ok_or_else(|| SignupError::invalid("Missing full_name"))?;
        Ok(RedeemInput {
            email,
            code,
            provisioning: Provisioning::Employee(EmployeeSignup {
                password: self.password.unwrap_or_default(),
                company_code: Some(company_code),
                full_name: Some(full_name),
            }),
        })
    }
}

pub async fn employee_link(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<EmployeeLinkRequest>,
) -> Result<Json<EmployeeLinkResponse>, SignupError> {
    let input = body.into_input()?;
    let usecase = RedeemCodeUseCase {
        codes: state.signup_code_repo(),
        companies: state.company_repo(),
        employees: state.employee_repo(),
        profiles: state.profile_repo(),
        subscriptions: state.subscription_repo(),
        identity: state.identity_port(),
        salt: state.code_salt.clone(),
        prices: state.module_prices.clone(),
    };
    let output = usecase.execute(input).await?;
    Ok(Json(EmployeeLinkResponse {
        ok: true,
        user_id: output.user_id,
        company_id: output.company_id,
    }))
}
