use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Employees::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Employees::FullName).string().not_null())
                    .col(ColumnDef::new(Employees::JobTitle).string())
                    .col(ColumnDef::new(Employees::JobCategory).string())
                    .col(
                        ColumnDef::new(Employees::EmployeeCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Employees::UserId).uuid())
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Employees::Table, Employees::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Roster lookups during employee signup filter by company.
        manager
            .create_index(
                Index::create()
                    .table(Employees::Table)
                    .col(Employees::CompanyId)
                    .name("idx_employees_company_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    CompanyId,
    FullName,
    JobTitle,
    JobCategory,
    EmployeeCode,
    IsAdmin,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Companies {
    Table,
    Id,
}
