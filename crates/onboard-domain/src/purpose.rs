//! Signup purposes and profile roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a signup code was issued for.
///
/// Wire format: `"owner_signup"` / `"employee_signup"`, both in request bodies and in the
/// `signup_codes.purpose` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupPurpose {
    /// A new company owner creating the company and its first admin account.
    #[default]
    OwnerSignup,
    /// An employee linking an account to an existing roster entry.
    EmployeeSignup,
}

impl SignupPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OwnerSignup => "owner_signup",
            Self::EmployeeSignup => "employee_signup",
        }
    }
}

impl fmt::Display for SignupPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported purpose: {0}")]
pub struct UnknownPurpose(pub String);

impl FromStr for SignupPurpose {
    type Err = UnknownPurpose;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner_signup" => Ok(Self::OwnerSignup),
            "employee_signup" => Ok(Self::EmployeeSignup),
            other => Err(UnknownPurpose(other.to_owned())),
        }
    }
}

/// Role stored on a profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Owner,
    Employee,
}

impl ProfileRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Employee => "employee",
        }
    }
}

impl From<SignupPurpose> for ProfileRole {
    fn from(purpose: SignupPurpose) -> Self {
        match purpose {
            SignupPurpose::OwnerSignup => Self::Owner,
            SignupPurpose::EmployeeSignup => Self::Employee,
        }
    }
}
