use entity::{
    problem_tags::{self, constraints::*},
    problems, tags,
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
                    .table(problem_tags::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(problem_tags::Column::ProblemId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(problem_tags::Column::TagId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name(PK_PROBLEM_TAGS)
                            .col(problem_tags::Column::ProblemId)
                            .col(problem_tags::Column::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PROBLEM_TAGS_PROBLEM_ID)
                            .from(problem_tags::Entity, problem_tags::Column::ProblemId)
                            .to(problems::Entity, problems::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PROBLEM_TAGS_TAG_ID)
                            .from(problem_tags::Entity, problem_tags::Column::TagId)
                            .to(tags::Entity, tags::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(problem_tags::Entity).to_owned())
            .await
    }
}
