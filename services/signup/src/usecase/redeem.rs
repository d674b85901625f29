//! Code redemption and account provisioning.
//!
//! One state machine serves both signup flows:
//!
//! 1. validate the request shape,
//! 2. load the latest code for the scope and check it is unused, fresh and matching,
//! 3. run the flow's business prechecks (email free, company and roster entry exist),
//! 4. consume the code with a conditional update,
//! 5. provision the account step by step.
//!
//! Every step that can fail for a business reason runs before the code is consumed. When a
//! provisioning step fails, the artefacts already created are removed in reverse order and
//! the code is released so the same code can be retried while it is still fresh.

use chrono::Utc;
use tracing::{error, info, warn};

use onboard_domain::id::{CompanyId, EmployeeId, SignupCodeId, SubscriptionId, UserId};
use onboard_domain::naming::names_match;
use onboard_domain::purpose::{ProfileRole, SignupPurpose};

use crate::domain::repository::{
    CompanyRepository, EmployeeRepository, IdentityPort, ProfileRepository,
    SignupCodeRepository, SubscriptionRepository,
};
use crate::domain::types::{
    CodeScope, Company, Employee, MIN_PASSWORD_LEN, NewCompany, NewIdentityUser,
    NewSubscription, Profile, SUBSCRIPTION_CURRENCY, SUBSCRIPTION_STATUS_ACTIVE, SignupCode,
};
use crate::error::SignupError;
use crate::usecase::code::{hash_code, is_well_formed};
use crate::usecase::pricing::{ModulePrices, Quote};
use crate::usecase::unique_code::unique_company_code;

/// Normalised redemption request.
#[derive(Debug, Clone)]
pub struct RedeemInput {
    pub email: String,
    pub code: String,
    pub provisioning: Provisioning,
}

/// Flow-specific signup details. Empty strings mean "not supplied".
#[derive(Debug, Clone)]
pub enum Provisioning {
    Owner(OwnerSignup),
    Employee(EmployeeSignup),
}

#[derive(Debug, Clone)]
pub struct OwnerSignup {
    pub password: String,
    pub full_name: String,
    pub company_name: String,
    pub company_size: String,
    pub max_employees: Option<i32>,
    pub module_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EmployeeSignup {
    pub password: String,
    /// Falls back to the company code stored with the signup code when `None`.
    pub company_code: Option<String>,
    /// Falls back to the name stored with the signup code when `None`.
    pub full_name: Option<String>,
}

impl Provisioning {
    pub fn purpose(&self) -> SignupPurpose {
        match self {
            Self::Owner(_) => SignupPurpose::OwnerSignup,
            Self::Employee(_) => SignupPurpose::EmployeeSignup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemOutput {
    pub purpose: SignupPurpose,
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub company_code: String,
    pub employee_id: Option<EmployeeId>,
    pub subscription_id: Option<SubscriptionId>,
}

/// Provisioning work decided by the prechecks.
enum Plan {
    Owner {
        email: String,
        password: String,
        full_name: String,
        company_name: String,
        company_size: String,
        max_employees: Option<i32>,
        quote: Option<Quote>,
    },
    Employee {
        email: String,
        password: String,
        company: Company,
        employee: Employee,
    },
}

/// Artefact created during provisioning, with enough data to undo it.
#[derive(Debug, Clone, Copy)]
enum Created {
    IdentityUser(UserId),
    Company(CompanyId),
    Profile(UserId),
    EmployeeLink(EmployeeId),
}

pub struct RedeemCodeUseCase<C, Co, E, P, S, I>
where
    C: SignupCodeRepository,
    Co: CompanyRepository,
    E: EmployeeRepository,
    P: ProfileRepository,
    S: SubscriptionRepository,
    I: IdentityPort,
{
    pub codes: C,
    pub companies: Co,
    pub employees: E,
    pub profiles: P,
    pub subscriptions: S,
    pub identity: I,
    pub salt: String,
    pub prices: ModulePrices,
}

impl<C, Co, E, P, S, I> RedeemCodeUseCase<C, Co, E, P, S, I>
where
    C: SignupCodeRepository,
    Co: CompanyRepository,
    E: EmployeeRepository,
    P: ProfileRepository,
    S: SubscriptionRepository,
    I: IdentityPort,
{
    pub async fn execute(&self, input: RedeemInput) -> Result<RedeemOutput, SignupError> {
        validate(&input)?;

        let scope = CodeScope {
            email: input.email.clone(),
            purpose: input.provisioning.purpose(),
            company_code: match &input.provisioning {
                Provisioning::Employee(e) => e.company_code.clone(),
                Provisioning::Owner(_) => None,
            },
        };
        let row = self
            .codes
            .find_latest(&scope)
            .await?
            .ok_or(SignupError::CodeNotFound)?;
        let now = Utc::now();
        if row.is_used() {
            return Err(SignupError::CodeAlreadyUsed);
        }
        if row.is_expired_at(now) {
            return Err(SignupError::CodeExpired);
        }
        if hash_code(&input.code, &self.salt) != row.code_hash {
            return Err(SignupError::IncorrectCode);
        }

        let plan = self.prepare(input, &row).await?;

        if !self.codes.consume(row.id, now).await? {
            return Err(SignupError::CodeAlreadyUsed);
        }
        info!(code_id = %row.id, purpose = %row.purpose, "signup code consumed");

        let mut created = Vec::new();
        match self.provision(plan, &mut created).await {
            Ok(output) => Ok(output),
            Err(err) => {
                self.compensate(created, row.id).await;
                Err(err)
            }
        }
    }

    /// Business prechecks. Nothing is written here.
    async fn prepare(&self, input: RedeemInput, row: &SignupCode) -> Result<Plan, SignupError> {
        let email = input.email;
        match input.provisioning {
            Provisioning::Owner(owner) => {
                let quote = self.prices.quote(&owner.module_ids)?;
                self.ensure_email_free(&email).await?;
                Ok(Plan::Owner {
                    email,
                    password: owner.password,
                    full_name: owner.full_name,
                    company_name: owner.company_name,
                    company_size: owner.company_size,
                    max_employees: owner.max_employees,
                    quote,
                })
            }
            Provisioning::Employee(employee) => {
                let company_code = employee
                    .company_code
                    .or_else(|| row.company_code.clone())
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| SignupError::invalid("Missing company_code"))?;
                let full_name = employee
                    .full_name
                    .or_else(|| row.full_name.clone())
                    .map(|n| n.trim().to_owned())
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| SignupError::invalid("Missing full_name"))?;

                let company = self
                    .companies
                    .find_by_code(&company_code)
                    .await?
                    .ok_or(SignupError::CompanyNotFound)?;
                let roster = self.employees.list_by_company(company.id).await?;
                let entry = roster
                    .into_iter()
                    .filter(|e| e.user_id.is_none())
                    .find(|e| names_match(&e.full_name, &full_name))
                    .ok_or(SignupError::EmployeeNotOnRoster)?;
                self.ensure_email_free(&email).await?;

                Ok(Plan::Employee {
                    email,
                    password: employee.password,
                    company,
                    employee: entry,
                })
            }
        }
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), SignupError> {
        match self.identity.find_by_email(email).await? {
            Some(_) => Err(SignupError::EmailAlreadyRegistered),
            None => Ok(()),
        }
    }

    /// Run the provisioning steps, recording every created artefact in `created`.
    async fn provision(
        &self,
        plan: Plan,
        created: &mut Vec<Created>,
    ) -> Result<RedeemOutput, SignupError> {
        match plan {
            Plan::Owner {
                email,
                password,
                full_name,
                company_name,
                company_size,
                max_employees,
                quote,
            } => {
                let user = self
                    .identity
                    .create_user(&NewIdentityUser {
                        email: email.clone(),
                        password,
                        full_name: full_name.clone(),
                    })
                    .await?;
                created.push(Created::IdentityUser(user.id));

                let company_code = unique_company_code(&self.companies, &company_name).await?;
                let company = self
                    .companies
                    .create(&NewCompany {
                        company_name: company_name.clone(),
                        company_code,
                        owner_user_id: user.id,
                        company_size,
                        max_employees,
                    })
                    .await?;
                created.push(Created::Company(company.id));
                info!(
                    company_id = %company.id,
                    company_code = %company.company_code,
                    "company created"
                );

                self.profiles
                    .create(&Profile {
                        user_id: user.id,
                        email,
                        company_id: company.id,
                        company_name,
                        full_name,
                        job_title: None,
                        job_category: None,
                        role: ProfileRole::Owner,
                        is_admin: true,
                    })
                    .await?;
                created.push(Created::Profile(user.id));

                let subscription_id = match quote {
                    Some(quote) => {
                        let subscription = self
                            .subscriptions
                            .create(&NewSubscription {
                                company_id: company.id,
                                module_ids: quote.module_ids,
                                monthly_price: quote.monthly_price,
                                currency: SUBSCRIPTION_CURRENCY.to_owned(),
                                status: SUBSCRIPTION_STATUS_ACTIVE.to_owned(),
                            })
                            .await?;
                        info!(
                            subscription_id = %subscription.id,
                            monthly_price = subscription.monthly_price,
                            "subscription created"
                        );
                        Some(subscription.id)
                    }
                    None => None,
                };

                info!(user_id = %user.id, company_id = %company.id, "owner signup completed");
                Ok(RedeemOutput {
                    purpose: SignupPurpose::OwnerSignup,
                    user_id: user.id,
                    company_id: company.id,
                    company_code: company.company_code,
                    employee_id: None,
                    subscription_id,
                })
            }
            Plan::Employee {
                email,
                password,
                company,
                employee,
            } => {
                let user = self
                    .identity
                    .create_user(&NewIdentityUser {
                        email: email.clone(),
                        password,
                        full_name: employee.full_name.clone(),
                    })
                    .await?;
                created.push(Created::IdentityUser(user.id));

                if !self.employees.link_user(employee.id, user.id).await? {
                    return Err(SignupError::EmployeeNotOnRoster);
                }
                created.push(Created::EmployeeLink(employee.id));
                info!(employee_id = %employee.id, company_id = %company.id, "employee linked");

                self.profiles
                    .create(&Profile {
                        user_id: user.id,
                        email,
                        company_id: company.id,
                        company_name: company.company_name,
                        full_name: employee.full_name,
                        job_title: employee.job_title,
                        job_category: employee.job_category,
                        role: ProfileRole::Employee,
                        is_admin: employee.is_admin,
                    })
                    .await?;
                created.push(Created::Profile(user.id));

                info!(user_id = %user.id, company_id = %company.id, "employee signup completed");
                Ok(RedeemOutput {
                    purpose: SignupPurpose::EmployeeSignup,
                    user_id: user.id,
                    company_id: company.id,
                    company_code: company.company_code,
                    employee_id: Some(employee.id),
                    subscription_id: None,
                })
            }
        }
    }

    /// Undo `created` in reverse order, then release the code. Failures are logged only.
    async fn compensate(&self, created: Vec<Created>, code_id: SignupCodeId) {
        for step in created.into_iter().rev() {
            let result = match step {
                Created::Profile(user_id) => self.profiles.delete(user_id).await,
                Created::EmployeeLink(id) => self.employees.unlink_user(id).await,
                Created::Company(id) => self.companies.delete(id).await,
                Created::IdentityUser(id) => self.identity.delete_user(id).await,
            };
            match result {
                Ok(()) => warn!(?step, "signup step compensated"),
                Err(e) => error!(?step, error = %e, "signup compensation failed"),
            }
        }
        match self.codes.release(code_id).await {
            Ok(()) => warn!(%code_id, "signup code released"),
            Err(e) => error!(%code_id, error = %e, "signup code release failed"),
        }
    }
}

/// Shape checks that need no collaborator.
fn validate(input: &RedeemInput) -> Result<(), SignupError> {
    if input.email.is_empty() {
        return Err(SignupError::invalid("Missing email"));
    }
    if !is_well_formed(&input.code) {
        return Err(SignupError::invalid("Missing 6-digit code"));
    }
    match &input.provisioning {
        Provisioning::Owner(owner) => {
            check_password(&owner.password)?;
            if owner.company_name.is_empty() {
                return Err(SignupError::invalid("Missing company_name"));
            }
            if owner.company_size.is_empty() {
                return Err(SignupError::invalid("Missing company_size"));
            }
            if owner.full_name.is_empty() {
                return Err(SignupError::invalid("Missing full_name"));
            }
            if owner.max_employees.is_some_and(|n| n < 0) {
                return Err(SignupError::invalid("max_employees must not be negative"));
            }
        }
        Provisioning::Employee(employee) => check_password(&employee.password)?,
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), SignupError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SignupError::invalid(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
