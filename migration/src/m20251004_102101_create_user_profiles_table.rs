use entity::{
    grades,
    user_profiles::{self, constraints::*},
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
                    .table(user_profiles::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(user_profiles::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(user_profiles::Column::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(user_profiles::Column::GradeId).integer().null())
                    .col(
                        ColumnDef::new(user_profiles::Column::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(user_profiles::Column::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .index(
                        Index::create()
                            .name(UC_USER_PROFILES_USER_ID)
                            .col(user_profiles::Column::UserId)
                            .unique(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_USER_PROFILES_USER_ID)
                            .from(user_profiles::Entity, user_profiles::Column::UserId)
                            .to(users::Entity, users::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_USER_PROFILES_GRADE_ID)
                            .from(user_profiles::Entity, user_profiles::Column::GradeId)
                            .to(grades::Entity, grades::Column::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(user_profiles::Entity).to_owned())
            .await
    }
}
