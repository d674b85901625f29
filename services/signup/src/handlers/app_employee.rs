use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use onboard_core::extract::JsonBody;
use onboard_domain::naming::normalize_company_code;

use crate::domain::types::Employee;
use crate::error::SignupError;
use crate::handlers::trimmed;
use crate::state::AppState;
use crate::usecase::employee::{AddEmployeeInput, AddEmployeeUseCase};

#[derive(Debug, Default, Deserialize)]
pub struct AddEmployeeRequest {
    pub company_id: Option<String>,
    pub company_code: Option<String>,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub job_category: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AddEmployeeResponse {
    pub ok: bool,
    pub employee: Employee,
}

pub async fn add_employee(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AddEmployeeRequest>,
) -> Result<Json<AddEmployeeResponse>, SignupError> {
    let input = AddEmployeeInput {
        company_id: trimmed(body.company_id),
        company_code: normalize_company_code(&trimmed(body.company_code)),
        full_name: trimmed(body.full_name),
        job_title: trimmed(body.job_title),
        job_category: trimmed(body.job_category),
        is_admin: body.is_admin.unwrap_or(false),
    };
    let usecase = AddEmployeeUseCase {
        employees: state.employee_repo(),
    };
    let employee = usecase.execute(input).await?;
    Ok(Json(AddEmployeeResponse { ok: true, employee }))
}
