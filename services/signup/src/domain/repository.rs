#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use onboard_domain::id::{CompanyId, EmployeeId, SignupCodeId, UserId};

use crate::domain::types::{
    CodeScope, Company, EmailMessage, Employee, IdentityUser, NewCompany, NewEmployee,
    NewIdentityUser, NewSignupCode, NewSubscription, Profile, SignupCode, Subscription,
};
use crate::error::SignupError;

/// Repository for hashed one-time signup codes.
pub trait SignupCodeRepository: Send + Sync {
    /// Most recently issued code for the scope, used or not.
    async fn find_latest(&self, scope: &CodeScope) -> Result<Option<SignupCode>, SignupError>;

    /// Delete every unused code for the scope.
    async fn discard_unused(&self, scope: &CodeScope) -> Result<(), SignupError>;

    async fn create(&self, code: &NewSignupCode) -> Result<SignupCode, SignupError>;

    /// Set `used_at` only if it is still null. Returns `false` when another request
    /// consumed the code first.
    async fn consume(&self, id: SignupCodeId, at: DateTime<Utc>) -> Result<bool, SignupError>;

    /// Reset `used_at` to null so a failed signup can be retried with the same code.
    async fn release(&self, id: SignupCodeId) -> Result<(), SignupError>;
}

pub trait CompanyRepository: Send + Sync {
    async fn find_by_code(&self, company_code: &str) -> Result<Option<Company>, SignupError>;

    async fn code_exists(&self, company_code: &str) -> Result<bool, SignupError>;

    async fn create(&self, company: &NewCompany) -> Result<Company, SignupError>;

    async fn delete(&self, id: CompanyId) -> Result<(), SignupError>;
}

pub trait EmployeeRepository: Send + Sync {
    /// Roster of a company, capped at `ROSTER_FETCH_LIMIT` rows.
    async fn list_by_company(&self, company_id: CompanyId) -> Result<Vec<Employee>, SignupError>;

    async fn code_exists(&self, employee_code: &str) -> Result<bool, SignupError>;

    async fn create(&self, employee: &NewEmployee) -> Result<Employee, SignupError>;

    /// Attach an identity user to a roster entry that has none yet. Returns `false` when
    /// the entry was linked by someone else first.
    async fn link_user(&self, id: EmployeeId, user_id: UserId) -> Result<bool, SignupError>;

    async fn unlink_user(&self, id: EmployeeId) -> Result<(), SignupError>;
}

pub trait ProfileRepository: Send + Sync {
    async fn create(&self, profile: &Profile) -> Result<(), SignupError>;

    async fn delete(&self, user_id: UserId) -> Result<(), SignupError>;
}

pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription, SignupError>;
}

/// Port to the identity service holding login credentials.
pub trait IdentityPort: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityUser>, SignupError>;

    /// Create a confirmed user. An already-registered email is `EmailAlreadyRegistered`.
    async fn create_user(&self, user: &NewIdentityUser) -> Result<IdentityUser, SignupError>;

    async fn delete_user(&self, id: UserId) -> Result<(), SignupError>;
}

/// Port to the transactional email service.
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), SignupError>;
}
