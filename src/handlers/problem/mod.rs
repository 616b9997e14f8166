mod create;
mod delete;
mod detail;
mod form;
mod hint;
mod input;
mod list;
mod update;

use crate::{error, utils, Result, StateTrait};
use axum::{
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use entity::{
    problems::{self, HintKind},
    tags,
};
use sea_orm::ConnectionTrait;
use serde::Serialize;

use super::NamedResponse;

/// Problems shown per page in the list and the tag archive.
pub const PER_PAGE: u64 = 12;

/// Routes for a user's own problems
///
/// GET  /problems/
/// GET  /problem/new/
/// POST /problem/new/
/// GET  /problem/:id/
/// GET  /problem/:id/edit/
/// POST /problem/:id/edit/
/// GET  /problem/:id/delete/
/// POST /problem/:id/delete/
/// POST /problem/:id/hint/update/
/// GET  /tag/:id/
pub fn routes<S: StateTrait>() -> Router<S> {
    Router::new()
        .route("/problems/", get(list::list_problems::<S>))
        .route(
            "/problem/new/",
            get(form::new_problem_form::<S>).post(create::create_problem::<S>),
        )
        .route("/problem/:id/", get(detail::get_problem::<S>))
        .route(
            "/problem/:id/edit/",
            get(form::edit_problem_form::<S>).post(update::update_problem::<S>),
        )
        .route(
            "/problem/:id/delete/",
            get(delete::confirm_delete::<S>).post(delete::delete_problem::<S>),
        )
        .route("/problem/:id/hint/update/", post(hint::update_hint::<S>))
        .route("/tag/:id/", get(list::tag_archive::<S>))
}

#[derive(Debug, Serialize)]
pub struct HintResponse {
    pub text: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HintsResponse {
    pub approach: HintResponse,
    pub formula: HintResponse,
    pub technique: HintResponse,
}

#[derive(Debug, Serialize)]
pub struct ProblemResponse {
    pub id: i32,
    pub title: String,
    pub grade_id: Option<i32>,
    pub image: Option<String>,
    pub hints: HintsResponse,
    pub tags: Vec<NamedResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProblemResponse {
    pub fn new(problem: problems::Model, tags: Vec<tags::Model>) -> Self {
        let hint = |kind: HintKind| HintResponse {
            text: kind.text(&problem).to_owned(),
            image: kind.image(&problem).map(ToOwned::to_owned),
        };

        let hints = HintsResponse {
            approach: hint(HintKind::Approach),
            formula: hint(HintKind::Formula),
            technique: hint(HintKind::Technique),
        };

        Self {
            id: problem.id,
            title: problem.title,
            grade_id: problem.grade_id,
            image: problem.image,
            hints,
            tags: tags.into_iter().map(Into::into).collect(),
            created_at: problem.created_at,
            updated_at: problem.updated_at,
        }
    }
}

/// Looks a problem up within the caller's own problems.
pub async fn find_owned<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    id: i32,
) -> Result<problems::Model> {
    problems::Entity::find_owned_by_id(user_id, id)
        .one(db)
        .await?
        .ok_or(error::PROBLEM_NOT_FOUND)
}

/// Attaches the tags to each problem, keeping the order of `problems`.
pub async fn with_tags<C: ConnectionTrait>(
    db: &C,
    problems: Vec<problems::Model>,
) -> Result<Vec<ProblemResponse>> {
    let ids: Vec<i32> = problems.iter().map(|problem| problem.id).collect();
    let mut tags = utils::load_tags(db, &ids).await?;

    Ok(problems
        .into_iter()
        .map(|problem| {
            let tags = tags.remove(&problem.id).unwrap_or_default();
            ProblemResponse::new(problem, tags)
        })
        .collect())
}

pub async fn with_tags_one<C: ConnectionTrait>(
    db: &C,
    problem: problems::Model,
) -> Result<ProblemResponse> {
    let mut responses = with_tags(db, vec![problem]).await?;
    responses.pop().ok_or(error::INTERNAL)
}
