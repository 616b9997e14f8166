use entity::login_attempts;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(login_attempts::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(login_attempts::Column::Username)
                            .string_len(150)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(login_attempts::Column::Failures)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(login_attempts::Column::LastFailure)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(login_attempts::Column::LockedUntil)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(login_attempts::Entity).to_owned())
            .await
    }
}
