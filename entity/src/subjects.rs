use super::grades;
use sea_orm::{entity::prelude::*, QueryOrder};

pub mod constraints {
    pub const FK_SUBJECTS_GRADE_ID: &str = "FK_subjects_grade_id";
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub grade_id: i32,
    pub order: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Grade,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Grade => Entity::belongs_to(grades::Entity)
                .from(Column::GradeId)
                .to(grades::Column::Id)
                .into(),
        }
    }
}

impl Related<grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    #[inline]
    pub fn find_by_grade(grade_id: i32) -> Select<Entity> {
        Self::find()
            .filter(Column::GradeId.eq(grade_id))
            .order_by_asc(Column::Order)
            .order_by_asc(Column::Name)
    }
}
