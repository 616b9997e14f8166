//! Hints stored as separate rows. Superseded by the hint columns on
//! `problems`; kept read-only so old rows stay visible to staff.

use super::problems;
use sea_orm::entity::prelude::*;
use serde_repr::{Deserialize_repr, Serialize_repr};

pub mod constraints {
    pub const FK_HINTS_PROBLEM_ID: &str = "FK_hints_problem_id";
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub problem_id: i32,
    pub stage_type: Stage,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeUtc,
}

#[derive(
    EnumIter, DeriveActiveEnum, PartialEq, Eq, Clone, Copy, Debug, Serialize_repr, Deserialize_repr,
)]
#[repr(i16)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
pub enum Stage {
    Approach = 0,
    Formula = 1,
    Technique = 2,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Approach => "方針",
            Self::Formula => "公式",
            Self::Technique => "コツ",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Problem,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Problem => Entity::belongs_to(problems::Entity)
                .from(Column::ProblemId)
                .to(problems::Column::Id)
                .into(),
        }
    }
}

impl Related<problems::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Problem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
