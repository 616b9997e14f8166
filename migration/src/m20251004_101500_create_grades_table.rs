use entity::grades::{self, constraints::*};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(grades::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(grades::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(grades::Column::Code)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(grades::Column::Name).string_len(20).not_null())
                    .col(
                        ColumnDef::new(grades::Column::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .index(
                        Index::create()
                            .name(UC_GRADES_CODE)
                            .col(grades::Column::Code)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(grades::Entity).to_owned())
            .await
    }
}
