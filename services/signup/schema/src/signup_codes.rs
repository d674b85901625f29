use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Salted hash of a one-time signup code sent by email.
/// Expires 10 minutes after issue; `used_at` is set once, on redemption.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "signup_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub code_hash: String,
    /// `owner_signup` or `employee_signup`.
    pub purpose: String,
    pub company_code: Option<String>,
    pub full_name: Option<String>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub used_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
