use entity::{
    questions::{self, constraints::*},
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
                    .table(questions::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(questions::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(questions::Column::UserId).integer().null())
                    .col(ColumnDef::new(questions::Column::Name).string_len(100).not_null())
                    .col(ColumnDef::new(questions::Column::Email).string_len(254).not_null())
                    .col(
                        ColumnDef::new(questions::Column::Subject)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(questions::Column::Message).text().not_null())
                    .col(
                        ColumnDef::new(questions::Column::ProblemImage)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(questions::Column::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(questions::Column::IsReplied)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_QUESTIONS_USER_ID)
                            .from(questions::Entity, questions::Column::UserId)
                            .to(users::Entity, users::Column::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(questions::Entity).to_owned())
            .await
    }
}
