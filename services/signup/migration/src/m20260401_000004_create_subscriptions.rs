use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Subscriptions::CompanyId).uuid().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::ModuleIds)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::MonthlyPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subscriptions::Currency).string().not_null())
                    .col(ColumnDef::new(Subscriptions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subscriptions::Table, Subscriptions::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
    CompanyId,
    ModuleIds,
    MonthlyPrice,
    Currency,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Companies {
    Table,
    Id,
}
