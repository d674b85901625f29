use sea_orm_migration::prelude::*;

use onboard_signup_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
