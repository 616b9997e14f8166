use super::{grades, subjects};
use sea_orm::{entity::prelude::*, JoinType, QueryOrder, QuerySelect};

pub mod constraints {
    pub const UC_TAGS_NAME_GRADE: &str = "UC_tags_name_grade";
    pub const FK_TAGS_GRADE_ID: &str = "FK_tags_grade_id";
    pub const FK_TAGS_SUBJECT_ID: &str = "FK_tags_subject_id";
}

/// A study unit. No two tags of the same grade share a name.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub grade_id: Option<i32>,
    pub subject_id: Option<i32>,
    pub order: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Grade,
    Subject,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Grade => Entity::belongs_to(grades::Entity)
                .from(Column::GradeId)
                .to(grades::Column::Id)
                .into(),
            Self::Subject => Entity::belongs_to(subjects::Entity)
                .from(Column::SubjectId)
                .to(subjects::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Tags in the order they are taught: grade, then order, then name.
    #[inline]
    pub fn find_ordered() -> Select<Entity> {
        Self::find()
            .order_by_asc(Column::GradeId)
            .order_by_asc(Column::Order)
            .order_by_asc(Column::Name)
    }

    /// Tags of a grade grouped by subject, subjects in their own order.
    #[inline]
    pub fn find_by_grade(grade_id: i32) -> Select<Entity> {
        Self::find()
            .join(JoinType::LeftJoin, Relation::Subject.def())
            .filter(Column::GradeId.eq(grade_id))
            .order_by_asc(subjects::Column::Order)
            .order_by_asc(subjects::Column::Name)
            .order_by_asc(Column::SubjectId)
            .order_by_asc(Column::Order)
            .order_by_asc(Column::Name)
    }

    #[inline]
    pub fn find_by_subject(subject_id: i32) -> Select<Entity> {
        Self::find()
            .filter(Column::SubjectId.eq(subject_id))
            .order_by_asc(Column::Order)
            .order_by_asc(Column::Name)
    }
}
