//! Newtype wrappers for domain identifiers.
//!
//! Every row in the data store is keyed by a UUID assigned on insert; the
//! wrappers keep a company id from being passed where a user id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id! {
    /// Identity-service user (the auth account created on signup).
    UserId
}

uuid_id! {
    /// A tenant company.
    CompanyId
}

uuid_id! {
    /// A row in a company's employee roster.
    EmployeeId
}

uuid_id! {
    /// A stored one-time signup code.
    SignupCodeId
}

uuid_id! {
    /// A company's module subscription.
    SubscriptionId
}
