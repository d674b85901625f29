use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Email).string().not_null())
                    .col(ColumnDef::new(Profiles::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Profiles::CompanyName).string().not_null())
                    .col(ColumnDef::new(Profiles::FullName).string().not_null())
                    .col(ColumnDef::new(Profiles::JobTitle).string())
                    .col(ColumnDef::new(Profiles::JobCategory).string())
                    .col(ColumnDef::new(Profiles::Role).string().not_null())
                    .col(
                        ColumnDef::new(Profiles::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Profiles::Table, Profiles::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profiles {
    Table,
    UserId,
    Email,
    CompanyId,
    CompanyName,
    FullName,
    JobTitle,
    JobCategory,
    Role,
    IsAdmin,
    CreatedAt,
}

#[derive(Iden)]
enum Companies {
    Table,
    Id,
}
