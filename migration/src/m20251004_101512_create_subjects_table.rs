use entity::{
    grades,
    subjects::{self, constraints::*},
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
                    .table(subjects::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(subjects::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(subjects::Column::Name)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(subjects::Column::GradeId).integer().not_null())
                    .col(
                        ColumnDef::new(subjects::Column::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(subjects::Column::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SUBJECTS_GRADE_ID)
                            .from(subjects::Entity, subjects::Column::GradeId)
                            .to(grades::Entity, grades::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(subjects::Entity).to_owned())
            .await
    }
}
