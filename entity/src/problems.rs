use super::{grades, problem_tags, tags, users};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub mod constraints {
    pub const FK_PROBLEMS_USER_ID: &str = "FK_problems_user_id";
    pub const FK_PROBLEMS_GRADE_ID: &str = "FK_problems_grade_id";
    pub const IDX_PROBLEMS_USER_CREATED_AT: &str = "IDX_problems_user_id_created_at";
}

/// A problem recorded by a user together with the three hints they wrote
/// for it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "problems")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub grade_id: Option<i32>,
    pub title: String,
    pub image: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub hint_approach: String,
    pub hint_approach_image: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub hint_formula: String,
    pub hint_formula_image: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub hint_technique: String,
    pub hint_technique_image: Option<String>,
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

impl Related<tags::Entity> for Entity {
    fn to() -> RelationDef {
        problem_tags::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(problem_tags::Relation::Problem.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Every query for a user's problems starts here, so a problem of
    /// somebody else can never be selected.
    #[inline]
    pub fn find_owned(user_id: i32) -> Select<Entity> {
        Self::find().filter(Column::UserId.eq(user_id))
    }

    #[inline]
    pub fn find_owned_by_id(user_id: i32, id: i32) -> Select<Entity> {
        Self::find_owned(user_id).filter(Column::Id.eq(id))
    }
}

/// The three hint slots of a problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintKind {
    Approach,
    Formula,
    Technique,
}

impl HintKind {
    pub const ALL: [HintKind; 3] = [Self::Approach, Self::Formula, Self::Technique];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approach" => Some(Self::Approach),
            "formula" => Some(Self::Formula),
            "technique" => Some(Self::Technique),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approach => "approach",
            Self::Formula => "formula",
            Self::Technique => "technique",
        }
    }

    pub fn text_column(&self) -> Column {
        match self {
            Self::Approach => Column::HintApproach,
            Self::Formula => Column::HintFormula,
            Self::Technique => Column::HintTechnique,
        }
    }

    pub fn image_column(&self) -> Column {
        match self {
            Self::Approach => Column::HintApproachImage,
            Self::Formula => Column::HintFormulaImage,
            Self::Technique => Column::HintTechniqueImage,
        }
    }

    pub fn text<'a>(&self, model: &'a Model) -> &'a str {
        match self {
            Self::Approach => &model.hint_approach,
            Self::Formula => &model.hint_formula,
            Self::Technique => &model.hint_technique,
        }
    }

    pub fn image<'a>(&self, model: &'a Model) -> Option<&'a str> {
        match self {
            Self::Approach => model.hint_approach_image.as_deref(),
            Self::Formula => model.hint_formula_image.as_deref(),
            Self::Technique => model.hint_technique_image.as_deref(),
        }
    }
}
