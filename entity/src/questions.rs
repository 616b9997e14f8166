use super::users;
use sea_orm::entity::prelude::*;

pub mod constraints {
    pub const FK_QUESTIONS_USER_ID: &str = "FK_questions_user_id";
}

/// A message sent to the maintainer. Only `is_replied` ever changes after
/// creation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: String,
    pub email: String,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub problem_image: Option<String>,
    pub created_at: DateTimeUtc,
    pub is_replied: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::User => Entity::belongs_to(users::Entity)
                .from(Column::UserId)
                .to(users::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
