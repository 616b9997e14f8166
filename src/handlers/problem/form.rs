use super::{find_owned, with_tags_one, ProblemResponse};
use crate::{
    handlers::{GradeResponse, NamedResponse},
    security::session::CurrentUser,
    utils::deserialize_lenient_id,
    Json, Query, Result, StateTrait,
};
use axum::extract::{Path, State};
use entity::{grades, tags};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct FormQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    grade: Option<i32>,
}

/// Choices for the problem form: every grade and, once a grade is picked,
/// the tags of that grade.
#[derive(Serialize)]
pub struct FormContext {
    grades: Vec<GradeResponse>,
    selected_grade: Option<GradeResponse>,
    tags: Vec<NamedResponse>,
}

async fn form_context<C: ConnectionTrait>(db: &C, grade_id: Option<i32>) -> Result<FormContext> {
    let grades = grades::Entity::find_ordered().all(db).await?;

    let selected_grade = grade_id.and_then(|id| grades.iter().find(|grade| grade.id == id).cloned());

    let tags = match &selected_grade {
        Some(grade) => tags::Entity::find()
            .filter(tags::Column::GradeId.eq(grade.id))
            .order_by_asc(tags::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect(),
        None => Vec::new(),
    };

    Ok(FormContext {
        grades: grades.into_iter().map(Into::into).collect(),
        selected_grade: selected_grade.map(Into::into),
        tags,
    })
}

pub async fn new_problem_form<S: StateTrait>(
    State(state): State<S>,
    _user: CurrentUser,
    Query(query): Query<FormQuery>,
) -> Result<Json<FormContext>> {
    Ok(Json(form_context(state.db(), query.grade).await?))
}

#[derive(Serialize)]
pub struct EditFormResponse {
    problem: ProblemResponse,
    #[serde(flatten)]
    context: FormContext,
}

pub async fn edit_problem_form<S: StateTrait>(
    State(state): State<S>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<EditFormResponse>> {
    let problem = find_owned(state.db(), user.id, id).await?;
    let context = form_context(state.db(), problem.grade_id).await?;

    Ok(Json(EditFormResponse {
        problem: with_tags_one(state.db(), problem).await?,
        context,
    }))
}
