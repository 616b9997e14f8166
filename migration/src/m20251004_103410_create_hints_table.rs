use entity::{
    hints::{self, constraints::*},
    problems,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(hints::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(hints::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(hints::Column::ProblemId).integer().not_null())
                    .col(
                        ColumnDef::new(hints::Column::StageType)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(hints::Column::Content).text().not_null())
                    .col(
                        ColumnDef::new(hints::Column::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_HINTS_PROBLEM_ID)
                            .from(hints::Entity, hints::Column::ProblemId)
                            .to(problems::Entity, problems::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(hints::Entity).to_owned())
            .await
    }
}
