use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use onboard_domain::id::{CompanyId, EmployeeId, SignupCodeId, SubscriptionId, UserId};
use onboard_domain::purpose::SignupPurpose;
use onboard_signup_schema::{companies, employees, signup_codes, subscriptions};

use crate::domain::repository::{
    CompanyRepository, EmployeeRepository, ProfileRepository, SignupCodeRepository,
    SubscriptionRepository,
};
use crate::domain::types::{
    CodeScope, Company, Employee, NewCompany, NewEmployee, NewSignupCode, NewSubscription,
    Profile, ROSTER_FETCH_LIMIT, SignupCode, Subscription,
};
use crate::error::SignupError;
use crate::infra::supabase::{Filter, SupabaseClient, eq, is_null};

const SIGNUP_CODES: &str = "signup_codes";
const COMPANIES: &str = "companies";
const EMPLOYEES: &str = "employees";
const PROFILES: &str = "profiles";
const SUBSCRIPTIONS: &str = "subscriptions";

// ── SignupCode repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RestSignupCodeRepository {
    pub client: SupabaseClient,
}

fn scope_filters(scope: &CodeScope) -> Vec<Filter<'static>> {
    let mut filters = vec![eq("email", &scope.email), eq("purpose", scope.purpose)];
    if let Some(code) = &scope.company_code {
        filters.push(eq("company_code", code));
    }
    filters
}

impl SignupCodeRepository for RestSignupCodeRepository {
    async fn find_latest(&self, scope: &CodeScope) -> Result<Option<SignupCode>, SignupError> {
        let mut filters = vec![("select", "*".to_owned())];
        filters.extend(scope_filters(scope));
        filters.push(("order", "created_at.desc".to_owned()));
        filters.push(("limit", "1".to_owned()));
        let rows: Vec<signup_codes::Model> = self
            .client
            .select(SIGNUP_CODES, &filters, "Read signup_codes")
            .await?;
        rows.into_iter().next().map(signup_code_from_model).transpose()
    }

    async fn discard_unused(&self, scope: &CodeScope) -> Result<(), SignupError> {
        let mut filters = scope_filters(scope);
        filters.push(is_null("used_at"));
        self.client
            .delete(SIGNUP_CODES, &filters, "Discard signup_codes")
            .await
    }

    async fn create(&self, code: &NewSignupCode) -> Result<SignupCode, SignupError> {
        let model: signup_codes::Model = self
            .client
            .insert(SIGNUP_CODES, code, "Insert signup_code")
            .await?;
        signup_code_from_model(model)
    }

    async fn consume(&self, id: SignupCodeId, at: DateTime<Utc>) -> Result<bool, SignupError> {
        let rows: Vec<Value> = self
            .client
            .update(
                SIGNUP_CODES,
                &[eq("id", id), is_null("used_at")],
                &json!({ "used_at": at }),
                "Consume signup_code",
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn release(&self, id: SignupCodeId) -> Result<(), SignupError> {
        let _: Vec<Value> = self
            .client
            .update(
                SIGNUP_CODES,
                &[eq("id", id)],
                &json!({ "used_at": null }),
                "Release signup_code",
            )
            .await?;
        Ok(())
    }
}

fn signup_code_from_model(m: signup_codes::Model) -> Result<SignupCode, SignupError> {
    let purpose = m
        .purpose
        .parse::<SignupPurpose>()
        .with_context(|| format!("signup code {} has invalid purpose", m.id))?;
    Ok(SignupCode {
        id: SignupCodeId(m.id),
        email: m.email,
        code_hash: m.code_hash,
        purpose,
        company_code: m.company_code,
        full_name: m.full_name,
        expires_at: m.expires_at,
        used_at: m.used_at,
        created_at: m.created_at,
    })
}

// ── Company repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RestCompanyRepository {
    pub client: SupabaseClient,
}

impl CompanyRepository for RestCompanyRepository {
    async fn find_by_code(&self, company_code: &str) -> Result<Option<Company>, SignupError> {
        let rows: Vec<companies::Model> = self
            .client
            .select(
                COMPANIES,
                &[
                    ("select", "*".to_owned()),
                    eq("company_code", company_code),
                    ("limit", "1".to_owned()),
                ],
                "Company lookup",
            )
            .await?;
        Ok(rows.into_iter().next().map(company_from_model))
    }

    async fn code_exists(&self, company_code: &str) -> Result<bool, SignupError> {
        let rows: Vec<Value> = self
            .client
            .select(
                COMPANIES,
                &[
                    ("select", "id".to_owned()),
                    eq("company_code", company_code),
                    ("limit", "1".to_owned()),
                ],
                "Company code check",
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn create(&self, company: &NewCompany) -> Result<Company, SignupError> {
        let model: companies::Model = self
            .client
            .insert(COMPANIES, company, "Create company")
            .await?;
        Ok(company_from_model(model))
    }

    async fn delete(&self, id: CompanyId) -> Result<(), SignupError> {
        self.client
            .delete(COMPANIES, &[eq("id", id)], "Delete company")
            .await
    }
}

fn company_from_model(m: companies::Model) -> Company {
    Company {
        id: CompanyId(m.id),
        company_name: m.company_name,
        company_code: m.company_code,
        owner_user_id: UserId(m.owner_user_id),
        company_size: m.company_size,
        max_employees: m.max_employees,
        created_at: m.created_at,
    }
}

// ── Employee repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RestEmployeeRepository {
    pub client: SupabaseClient,
}

impl EmployeeRepository for RestEmployeeRepository {
    async fn list_by_company(&self, company_id: CompanyId) -> Result<Vec<Employee>, SignupError> {
        let rows: Vec<employees::Model> = self
            .client
            .select(
                EMPLOYEES,
                &[
                    ("select", "*".to_owned()),
                    eq("company_id", company_id),
                    ("order", "created_at.asc".to_owned()),
                    ("limit", ROSTER_FETCH_LIMIT.to_string()),
                ],
                "Employee lookup",
            )
            .await?;
        Ok(rows.into_iter().map(employee_from_model).collect())
    }

    async fn code_exists(&self, employee_code: &str) -> Result<bool, SignupError> {
        let rows: Vec<Value> = self
            .client
            .select(
                EMPLOYEES,
                &[
                    ("select", "id".to_owned()),
                    eq("employee_code", employee_code),
                    ("limit", "1".to_owned()),
                ],
                "Employee code check",
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn create(&self, employee: &NewEmployee) -> Result<Employee, SignupError> {
        let model: employees::Model = self
            .client
            .insert(EMPLOYEES, employee, "Add employee")
            .await?;
        Ok(employee_from_model(model))
    }

    async fn link_user(&self, id: EmployeeId, user_id: UserId) -> Result<bool, SignupError> {
        let rows: Vec<Value> = self
            .client
            .update(
                EMPLOYEES,
                &[eq("id", id), is_null("user_id")],
                &json!({ "user_id": user_id }),
                "Link employee",
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn unlink_user(&self, id: EmployeeId) -> Result<(), SignupError> {
        let _: Vec<Value> = self
            .client
            .update(
                EMPLOYEES,
                &[eq("id", id)],
                &json!({ "user_id": null }),
                "Unlink employee",
            )
            .await?;
        Ok(())
    }
}

fn employee_from_model(m: employees::Model) -> Employee {
    Employee {
        id: EmployeeId(m.id),
        company_id: CompanyId(m.company_id),
        full_name: m.full_name,
        job_title: m.job_title,
        job_category: m.job_category,
        employee_code: m.employee_code,
        is_admin: m.is_admin,
        user_id: m.user_id.map(UserId),
        created_at: m.created_at,
    }
}

// ── Profile repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RestProfileRepository {
    pub client: SupabaseClient,
}

impl ProfileRepository for RestProfileRepository {
    async fn create(&self, profile: &Profile) -> Result<(), SignupError> {
        let _: Value = self
            .client
            .insert(PROFILES, profile, "Create profile")
            .await?;
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> Result<(), SignupError> {
        self.client
            .delete(PROFILES, &[eq("user_id", user_id)], "Delete profile")
            .await
    }
}

// ── Subscription repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct RestSubscriptionRepository {
    pub client: SupabaseClient,
}

impl SubscriptionRepository for RestSubscriptionRepository {
    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription, SignupError> {
        let model: subscriptions::Model = self
            .client
            .insert(SUBSCRIPTIONS, subscription, "Create subscription")
            .await?;
        subscription_from_model(model)
    }
}

fn subscription_from_model(m: subscriptions::Model) -> Result<Subscription, SignupError> {
    let module_ids: Vec<String> = serde_json::from_value(m.module_ids)
        .with_context(|| format!("subscription {} has malformed module_ids", m.id))?;
    Ok(Subscription {
        id: SubscriptionId(m.id),
        company_id: CompanyId(m.company_id),
        module_ids,
        monthly_price: m.monthly_price,
        currency: m.currency,
        status: m.status,
    })
}
