mod hints;
mod problems;
mod questions;
mod taxonomy;
mod users;

use crate::state::StateTrait;
use axum::{
    routing::{get, patch, put},
    Router,
};
use entity::grades;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use std::collections::HashMap;

/// Staff-only views over the same tables the site uses
///
/// GET   /admin/users/
/// PUT   /admin/users/:id/profile/
/// GET   /admin/subjects/
/// POST  /admin/subjects/
/// GET   /admin/tags/
/// POST  /admin/tags/
/// GET   /admin/problems/
/// GET   /admin/hints/
/// GET   /admin/questions/
/// PATCH /admin/questions/:id/
pub fn routes<S: StateTrait>() -> Router<S> {
    Router::new()
        .route("/users/", get(users::list_users::<S>))
        .route("/users/:id/profile/", put(users::update_profile::<S>))
        .route(
            "/subjects/",
            get(taxonomy::list_subjects::<S>).post(taxonomy::create_subject::<S>),
        )
        .route(
            "/tags/",
            get(taxonomy::list_tags::<S>).post(taxonomy::create_tag::<S>),
        )
        .route("/problems/", get(problems::list_problems::<S>))
        .route("/hints/", get(hints::list_hints::<S>))
        .route("/questions/", get(questions::list_questions::<S>))
        .route("/questions/:id/", patch(questions::update_question::<S>))
}

/// Grade names by id, for the list columns.
async fn grade_names<C: ConnectionTrait>(db: &C) -> Result<HashMap<i32, String>, DbErr> {
    Ok(grades::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|grade| (grade.id, grade.name))
        .collect())
}

fn name_or_dash(names: &HashMap<i32, String>, id: Option<i32>) -> String {
    id.and_then(|id| names.get(&id))
        .cloned()
        .unwrap_or_else(|| "-".to_owned())
}
