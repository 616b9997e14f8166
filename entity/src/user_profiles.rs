use super::{grades, users};
use sea_orm::entity::prelude::*;

pub mod constraints {
    pub const UC_USER_PROFILES_USER_ID: &str = "UC_user_profiles_user_id";
    pub const FK_USER_PROFILES_USER_ID: &str = "FK_user_profiles_user_id";
    pub const FK_USER_PROFILES_GRADE_ID: &str = "FK_user_profiles_grade_id";
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub grade_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Grade,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::User => Entity::belongs_to(users::Entity)
                .from(Column::UserId)
                .to(users::Column::Id)
                .into(),
            Self::Grade => Entity::belongs_to(grades::Entity)
                .from(Column::GradeId)
                .to(grades::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    #[inline]
    pub fn find_by_user(user_id: i32) -> Select<Entity> {
        Self::find().filter(Column::UserId.eq(user_id))
    }
}
