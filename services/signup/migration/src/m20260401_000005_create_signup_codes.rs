use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SignupCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SignupCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(SignupCodes::Email).string().not_null())
                    .col(ColumnDef::new(SignupCodes::CodeHash).string().not_null())
                    .col(ColumnDef::new(SignupCodes::Purpose).string().not_null())
                    .col(ColumnDef::new(SignupCodes::CompanyCode).string())
                    .col(ColumnDef::new(SignupCodes::FullName).string())
                    .col(
                        ColumnDef::new(SignupCodes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SignupCodes::UsedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(SignupCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Redemption reads the latest row per (email, purpose).
        manager
            .create_index(
                Index::create()
                    .table(SignupCodes::Table)
                    .col(SignupCodes::Email)
                    .col(SignupCodes::Purpose)
                    .col(SignupCodes::CreatedAt)
                    .name("idx_signup_codes_email_purpose_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SignupCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SignupCodes {
    Table,
    Id,
    Email,
    CodeHash,
    Purpose,
    CompanyCode,
    FullName,
    ExpiresAt,
    UsedAt,
    CreatedAt,
}
