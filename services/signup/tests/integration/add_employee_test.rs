use onboard_signup::error::SignupError;
use onboard_signup::usecase::employee::{AddEmployeeInput, AddEmployeeUseCase};

use crate::helpers::{MockEmployeeRepo, World};

fn input(company_id: &str) -> AddEmployeeInput {
    AddEmployeeInput {
        company_id: company_id.to_owned(),
        company_code: "ACM123456".to_owned(),
        full_name: "Jane Doe".to_owned(),
        job_title: "Chef".to_owned(),
        job_category: String::new(),
        is_admin: false,
    }
}

#[tokio::test]
async fn should_add_unlinked_roster_entry_with_prefixed_code() {
    let world = World::new();
    let company = world.seed_company("Acme", "ACM123456");

    let employee = AddEmployeeUseCase {
        employees: world.employees.clone(),
    }
    .execute(input(&company.id.to_string()))
    .await
    .unwrap();

    assert_eq!(employee.company_id, company.id);
    assert_eq!(employee.full_name, "Jane Doe");
    assert_eq!(employee.job_title.as_deref(), Some("Chef"));
    assert_eq!(employee.job_category, None, "blank job field is stored as null");
    assert_eq!(employee.user_id, None);
    assert!(employee.employee_code.starts_with("ACM"));
    assert_eq!(employee.employee_code.len(), 12);
    assert!(employee.employee_code[3..].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(world.employees.employees.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_give_each_employee_a_distinct_code() {
    let world = World::new();
    let company = world.seed_company("Acme", "ACM123456");
    let uc = AddEmployeeUseCase {
        employees: world.employees.clone(),
    };

    let first = uc.execute(input(&company.id.to_string())).await.unwrap();
    let second = uc.execute(input(&company.id.to_string())).await.unwrap();

    assert_ne!(first.employee_code, second.employee_code);
}

#[tokio::test]
async fn should_reject_malformed_company_id() {
    let uc = AddEmployeeUseCase {
        employees: MockEmployeeRepo::default(),
    };

    let result = uc.execute(input("not-a-uuid")).await;

    assert!(
        matches!(result, Err(SignupError::InvalidInput(ref m)) if m == "Invalid company_id"),
        "expected Invalid company_id, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_company_id_then_code_then_name() {
    let uc = AddEmployeeUseCase {
        employees: MockEmployeeRepo::default(),
    };
    let company_id = uuid::Uuid::new_v4().to_string();

    let result = uc.execute(input("")).await;
    assert!(matches!(result, Err(SignupError::InvalidInput(ref m)) if m == "Missing company_id"));

    let mut short_code = input(&company_id);
    short_code.company_code = "AC".to_owned();
    let result = uc.execute(short_code).await;
    assert!(matches!(result, Err(SignupError::InvalidInput(ref m)) if m == "Missing company_code"));

    let mut no_name = input(&company_id);
    no_name.full_name.clear();
    let result = uc.execute(no_name).await;
    assert!(matches!(result, Err(SignupError::InvalidInput(ref m)) if m == "Missing full_name"));
}
