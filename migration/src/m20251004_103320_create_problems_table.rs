use entity::{
    grades,
    problems::{self, constraints::*},
    users,
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
                    .table(problems::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(problems::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(problems::Column::UserId).integer().not_null())
                    .col(ColumnDef::new(problems::Column::GradeId).integer().null())
                    .col(
                        ColumnDef::new(problems::Column::Title)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(problems::Column::Image).string_len(255).null())
                    .col(
                        ColumnDef::new(problems::Column::HintApproach)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(problems::Column::HintApproachImage)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(problems::Column::HintFormula)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(problems::Column::HintFormulaImage)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(problems::Column::HintTechnique)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(problems::Column::HintTechniqueImage)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(problems::Column::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(problems::Column::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PROBLEMS_USER_ID)
                            .from(problems::Entity, problems::Column::UserId)
                            .to(users::Entity, users::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PROBLEMS_GRADE_ID)
                            .from(problems::Entity, problems::Column::GradeId)
                            .to(grades::Entity, grades::Column::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PROBLEMS_USER_CREATED_AT)
                    .table(problems::Entity)
                    .col(problems::Column::UserId)
                    .col(problems::Column::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(problems::Entity).to_owned())
            .await
    }
}
