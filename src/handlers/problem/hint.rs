use super::find_owned;
use crate::{error, security::session::CurrentUser, Json, StateTrait};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use entity::problems::HintKind;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct Request {
    #[serde(default)]
    hint_type: String,
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
pub struct Response {
    success: bool,
    message: &'static str,
}

fn reply(status: StatusCode, success: bool, message: &'static str) -> (StatusCode, Json<Response>) {
    (status, Json(Response { success, message }))
}

/// Overwrites one hint text of a problem. Answers in the `{success, message}`
/// shape the inline editor expects, also for failures.
pub async fn update_hint<S: StateTrait>(
    State(state): State<S>,
    user: CurrentUser,
    Path(id): Path<i32>,
    body: Bytes,
) -> (StatusCode, Json<Response>) {
    let problem = match find_owned(state.db(), user.id, id).await {
        Ok(problem) => problem,
        Err(err) if err.code() == error::PROBLEM_NOT_FOUND.code() => {
            return reply(StatusCode::NOT_FOUND, false, "Problem not found.");
        }
        Err(_) => {
            error!(problem_id = id, "failed to load problem for hint update");
            return reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                false,
                "An error occurred while saving the hint.",
            );
        }
    };

    let Ok(request) = serde_json::from_slice::<Request>(&body) else {
        return reply(StatusCode::BAD_REQUEST, false, "Invalid JSON.");
    };

    let Some(kind) = HintKind::parse(request.hint_type.trim()) else {
        return reply(StatusCode::BAD_REQUEST, false, "Invalid hint type.");
    };

    let mut active = problem.into_active_model();
    active.set(kind.text_column(), request.content.trim().to_owned().into());
    active.updated_at = Set(Utc::now());

    if let Err(err) = active.update(state.db()).await {
        error!(problem_id = id, "failed to update hint: {err}");
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            false,
            "An error occurred while saving the hint.",
        );
    }

    info!(problem_id = id, hint_type = kind.as_str(), "hint updated");

    reply(StatusCode::OK, true, "Hint saved.")
}
