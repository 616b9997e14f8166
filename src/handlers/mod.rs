mod admin;
mod auth;
mod problem;
mod question;
mod taxonomy;

use crate::{security::session::CurrentUser, state::StateTrait, Json};
use axum::{extract::State, http::StatusCode, routing::get, Router};
use entity::grades;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use serde_json::{json, Value};

pub fn routes<S: StateTrait>() -> Router<S> {
    Router::new()
        .route("/", get(index))
        .merge(auth::routes::<S>())
        .merge(problem::routes::<S>())
        .merge(question::routes::<S>())
        .nest("/api", taxonomy::routes::<S>())
        .nest("/admin", admin::routes::<S>())
        .route("/livez", get(liveness::<S>))
        .route("/readyz", get(|| async {}))
}

async fn index(user: Option<CurrentUser>) -> Json<Value> {
    Json(json!({
        "name": "MathHint",
        "authenticated": user.is_some(),
        "username": user.as_ref().map(|user| user.username.clone()),
        "links": {
            "problems": "/problems/",
            "login": "/login/",
            "signup": "/signup/",
            "question": "/question/",
        },
    }))
}

async fn liveness<S: StateTrait>(State(state): State<S>) -> StatusCode {
    if state.db().execute_unprepared("select 1").await.is_err() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub id: i32,
    pub code: grades::GradeCode,
    pub name: String,
}

impl From<grades::Model> for GradeResponse {
    fn from(grade: grades::Model) -> Self {
        Self {
            id: grade.id,
            code: grade.code,
            name: grade.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NamedResponse {
    pub id: i32,
    pub name: String,
}

impl From<entity::tags::Model> for NamedResponse {
    fn from(tag: entity::tags::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

impl From<entity::subjects::Model> for NamedResponse {
    fn from(subject: entity::subjects::Model) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
        }
    }
}
