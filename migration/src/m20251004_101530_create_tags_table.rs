use entity::{
    grades, subjects,
    tags::{self, constraints::*},
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
                    .table(tags::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(tags::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(tags::Column::Name).string_len(50).not_null())
                    .col(ColumnDef::new(tags::Column::GradeId).integer().null())
                    .col(ColumnDef::new(tags::Column::SubjectId).integer().null())
                    .col(
                        ColumnDef::new(tags::Column::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(tags::Column::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .index(
                        Index::create()
                            .name(UC_TAGS_NAME_GRADE)
                            .col(tags::Column::Name)
                            .col(tags::Column::GradeId)
                            .unique(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TAGS_GRADE_ID)
                            .from(tags::Entity, tags::Column::GradeId)
                            .to(grades::Entity, grades::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TAGS_SUBJECT_ID)
                            .from(tags::Entity, tags::Column::SubjectId)
                            .to(subjects::Entity, subjects::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(tags::Entity).to_owned())
            .await
    }
}
