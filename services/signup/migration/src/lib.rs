use sea_orm_migration::prelude::*;

mod m20260401_000001_create_companies;
mod m20260401_000002_create_employees;
mod m20260401_000003_create_profiles;
mod m20260401_000004_create_subscriptions;
mod m20260401_000005_create_signup_codes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_companies::Migration),
            Box::new(m20260401_000002_create_employees::Migration),
            Box::new(m20260401_000003_create_profiles::Migration),
            Box::new(m20260401_000004_create_subscriptions::Migration),
            Box::new(m20260401_000005_create_signup_codes::Migration),
        ]
    }
}
