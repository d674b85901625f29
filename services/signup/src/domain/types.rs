use chrono::{DateTime, Utc};
use serde::Serialize;

use onboard_core::serde::to_rfc3339_ms;
use onboard_domain::id::{CompanyId, EmployeeId, SignupCodeId, SubscriptionId, UserId};
use onboard_domain::purpose::{ProfileRole, SignupPurpose};

/// Stored one-time signup code. Only the salted hash is ever persisted.
#[derive(Debug, Clone)]
pub struct SignupCode {
    pub id: SignupCodeId,
    pub email: String,
    pub code_hash: String,
    pub purpose: SignupPurpose,
    pub company_code: Option<String>,
    pub full_name: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SignupCode {
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Row written by the code issuer; id and timestamps come from the data store.
#[derive(Debug, Clone, Serialize)]
pub struct NewSignupCode {
    pub email: String,
    pub code_hash: String,
    pub purpose: SignupPurpose,
    pub company_code: Option<String>,
    pub full_name: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// Scope of one signup code: at most one unused code lives per scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeScope {
    pub email: String,
    pub purpose: SignupPurpose,
    pub company_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Company {
    pub id: CompanyId,
    pub company_name: String,
    pub company_code: String,
    pub owner_user_id: UserId,
    pub company_size: String,
    pub max_employees: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCompany {
    pub company_name: String,
    pub company_code: String,
    pub owner_user_id: UserId,
    pub company_size: String,
    pub max_employees: Option<i32>,
}

/// Roster entry. `user_id` is set once the named person redeems an employee code.
#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub company_id: CompanyId,
    pub full_name: String,
    pub job_title: Option<String>,
    pub job_category: Option<String>,
    pub employee_code: String,
    pub is_admin: bool,
    pub user_id: Option<UserId>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewEmployee {
    pub company_id: CompanyId,
    pub full_name: String,
    pub job_title: Option<String>,
    pub job_category: Option<String>,
    pub employee_code: String,
    pub is_admin: bool,
}

/// Application profile keyed by the identity user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub user_id: UserId,
    pub email: String,
    pub company_id: CompanyId,
    pub company_name: String,
    pub full_name: String,
    pub job_title: Option<String>,
    pub job_category: Option<String>,
    pub role: ProfileRole,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub company_id: CompanyId,
    pub module_ids: Vec<String>,
    pub monthly_price: i64,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSubscription {
    pub company_id: CompanyId,
    pub module_ids: Vec<String>,
    pub monthly_price: i64,
    pub currency: String,
    pub status: String,
}

/// Account in the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub id: UserId,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewIdentityUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Outgoing transactional email. The sender is fixed by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Number of decimal digits in a signup code.
pub const SIGNUP_CODE_LEN: usize = 6;

/// Signup code time-to-live in seconds.
pub const SIGNUP_CODE_TTL_SECS: i64 = 600;

/// Random digits appended to a company code prefix.
pub const COMPANY_CODE_DIGITS: u32 = 6;

/// Random digits appended to an employee code prefix.
pub const EMPLOYEE_CODE_DIGITS: u32 = 9;

/// Collision probes before a generated company code is used anyway.
pub const COMPANY_CODE_ATTEMPTS: usize = 10;

/// Collision probes before a generated employee code is used anyway.
pub const EMPLOYEE_CODE_ATTEMPTS: usize = 12;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Upper bound on roster rows scanned for a name match.
pub const ROSTER_FETCH_LIMIT: u64 = 200;

pub const SUBSCRIPTION_CURRENCY: &str = "GBP";
pub const SUBSCRIPTION_STATUS_ACTIVE: &str = "active";
