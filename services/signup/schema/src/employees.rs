use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Roster entry added by a company admin. `user_id` stays null until the named employee
/// redeems an employee signup code.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub full_name: String,
    pub job_title: Option<String>,
    pub job_category: Option<String>,
    /// Company-code prefix + nine digits, e.g. `ACM000123456`.
    #[sea_orm(unique)]
    pub employee_code: String,
    pub is_admin: bool,
    pub user_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Company,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
