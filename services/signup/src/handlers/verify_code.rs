use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use onboard_core::extract::JsonBody;
use onboard_domain::id::{CompanyId, EmployeeId, SubscriptionId, UserId};
use onboard_domain::naming::{normalize_company_code, normalize_email};
use onboard_domain::purpose::SignupPurpose;

use crate::error::SignupError;
use crate::handlers::{lenient_i32, lenient_string, non_blank, parse_purpose, trimmed};
use crate::state::AppState;
use crate::usecase::redeem::{
    EmployeeSignup, OwnerSignup, Provisioning, RedeemCodeUseCase, RedeemInput, RedeemOutput,
};

#[derive(Debug, Default, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    pub purpose: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_size: Option<String>,
    /// Older clients send the size under this name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_size_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub max_employees: Option<i32>,
    pub company_code: Option<String>,
    pub module_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct VerifyCodeResponse {
    pub ok: bool,
    pub created: bool,
    pub purpose: SignupPurpose,
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub company_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<SubscriptionId>,
}

impl From<RedeemOutput> for VerifyCodeResponse {
    fn from(out: RedeemOutput) -> Self {
        Self {
            ok: true,
            created: true,
            purpose: out.purpose,
            user_id: out.user_id,
            company_id: out.company_id,
            company_code: out.company_code,
            employee_id: out.employee_id,
            subscription_id: out.subscription_id,
        }
    }
}

impl VerifyCodeRequest {
    fn into_input(self) -> Result<RedeemInput, SignupError> {
        let provisioning = match parse_purpose(self.purpose.as_deref())? {
            SignupPurpose::OwnerSignup => Provisioning::Owner(OwnerSignup {
                password: self.password.unwrap_or_default(),
                full_name: trimmed(self.full_name),
                company_name: trimmed(self.company_name),
                company_size: non_blank(self.company_size)
                    .or_else(|| non_blank(self.company_size_id))
                    .unwrap_or_default(),
                max_employees: self.max_employees,
                module_ids: self.module_ids.unwrap_or_default(),
            }),
            SignupPurpose::EmployeeSignup => Provisioning::Employee(EmployeeSignup {
                password: self.password.unwrap_or_default(),
                company_code: non_blank(self.company_code).map(|c| normalize_company_code(&c)),
                full_name: non_blank(self.full_name),
            }),
        };
        Ok(RedeemInput {
            email: normalize_email(&trimmed(self.email)),
            code: trimmed(self.code),
            provisioning,
        })
    }
}

pub async fn verify_code(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>, SignupError> {
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
    Ok(Json(output.into()))
}
