use super::NamedResponse;
use crate::{security::session::CurrentUser, Json, Result, StateTrait};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use entity::{subjects, tags};
use serde::Serialize;

/// Lookups driving the cascading grade/subject/tag selects
///
/// GET /api/grades/:id/subjects/
/// GET /api/grades/:id/tags/
/// GET /api/subjects/:id/tags/
pub fn routes<S: StateTrait>() -> Router<S> {
    Router::new()
        .route("/grades/:id/subjects/", get(subjects_for_grade::<S>))
        .route("/grades/:id/tags/", get(tags_for_grade::<S>))
        .route("/subjects/:id/tags/", get(tags_for_subject::<S>))
}

#[derive(Serialize)]
pub struct SubjectsResponse {
    subjects: Vec<NamedResponse>,
}

#[derive(Serialize)]
pub struct TagsResponse {
    tags: Vec<NamedResponse>,
}

async fn subjects_for_grade<S: StateTrait>(
    State(state): State<S>,
    _user: CurrentUser,
    Path(grade_id): Path<i32>,
) -> Result<Json<SubjectsResponse>> {
    let subjects = subjects::Entity::find_by_grade(grade_id)
        .all(state.db())
        .await?;

    Ok(Json(SubjectsResponse {
        subjects: subjects.into_iter().map(Into::into).collect(),
    }))
}

async fn tags_for_grade<S: StateTrait>(
    State(state): State<S>,
    _user: CurrentUser,
    Path(grade_id): Path<i32>,
) -> Result<Json<TagsResponse>> {
    let tags = tags::Entity::find_by_grade(grade_id).all(state.db()).await?;

    Ok(Json(TagsResponse {
        tags: tags.into_iter().map(Into::into).collect(),
    }))
}

async fn tags_for_subject<S: StateTrait>(
    State(state): State<S>,
    _user: CurrentUser,
    Path(subject_id): Path<i32>,
) -> Result<Json<TagsResponse>> {
    let tags = tags::Entity::find_by_subject(subject_id)
        .all(state.db())
        .await?;

    Ok(Json(TagsResponse {
        tags: tags.into_iter().map(Into::into).collect(),
    }))
}
