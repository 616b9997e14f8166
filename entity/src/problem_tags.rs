use super::{problems, tags};
use sea_orm::entity::prelude::*;

pub mod constraints {
    pub const PK_PROBLEM_TAGS: &str = "PK_problem_tags";
    pub const FK_PROBLEM_TAGS_PROBLEM_ID: &str = "FK_problem_tags_problem_id";
    pub const FK_PROBLEM_TAGS_TAG_ID: &str = "FK_problem_tags_tag_id";
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "problem_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub problem_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Problem,
    Tag,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Problem => Entity::belongs_to(problems::Entity)
                .from(Column::ProblemId)
                .to(problems::Column::Id)
                .into(),
            Self::Tag => Entity::belongs_to(tags::Entity)
                .from(Column::TagId)
                .to(tags::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
