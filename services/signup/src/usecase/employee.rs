use tracing::info;

use onboard_domain::id::CompanyId;
use onboard_domain::naming::CODE_PREFIX_LEN;

use crate::domain::repository::EmployeeRepository;
use crate::domain::types::{Employee, NewEmployee};
use crate::error::SignupError;
use crate::usecase::unique_code::unique_employee_code;

/// Normalised roster entry request. Empty strings mean "not supplied".
#[derive(Debug, Clone)]
pub struct AddEmployeeInput {
    pub company_id: String,
    pub company_code: String,
    pub full_name: String,
    pub job_title: String,
    pub job_category: String,
    pub is_admin: bool,
}

/// Adds a named person to a company roster so they can later sign up as an employee.
pub struct AddEmployeeUseCase<E>
where
    E: EmployeeRepository,
{
    pub employees: E,
}

impl<E> AddEmployeeUseCase<E>
where
    E: EmployeeRepository,
{
    pub async fn execute(&self, input: AddEmployeeInput) -> Result<Employee, SignupError> {
        if input.company_id.is_empty() {
            return Err(SignupError::invalid("Missing company_id"));
        }
        let company_id: CompanyId = input
            .company_id
            .parse()
            .map_err(|_| SignupError::invalid("Invalid company_id"))?;
        if input.company_code.chars().count() < CODE_PREFIX_LEN {
            return Err(SignupError::invalid("Missing company_code"));
        }
        if input.full_name.is_empty() {
            return Err(SignupError::invalid("Missing full_name"));
        }

        let employee_code = unique_employee_code(&self.employees, &input.company_code).await?;
        let employee = self
            .employees
            .create(&NewEmployee {
                company_id,
                full_name: input.full_name,
                job_title: non_empty(input.job_title),
                job_category: non_empty(input.job_category),
                employee_code,
                is_admin: input.is_admin,
            })
            .await?;
        info!(
            employee_id = %employee.id,
            company_id = %employee.company_id,
            "employee added to roster"
        );
        Ok(employee)
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
