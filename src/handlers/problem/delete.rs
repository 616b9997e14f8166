use super::{find_owned, input::remove_all, with_tags_one};
use crate::{security::session::CurrentUser, Json, Result, StateTrait};
use axum::extract::{Path, State};
use entity::problems::{self, HintKind};
use sea_orm::EntityTrait;
use serde_json::{json, Value};

pub async fn confirm_delete<S: StateTrait>(
    State(state): State<S>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let problem = find_owned(state.db(), user.id, id).await?;
    let problem = with_tags_one(state.db(), problem).await?;

    Ok(Json(json!({
        "problem": problem,
        "message": "This problem and its hints will be deleted permanently.",
    })))
}

pub async fn delete_problem<S: StateTrait>(
    State(state): State<S>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let problem = find_owned(state.db(), user.id, id).await?;

    // tag links and legacy hints go with it through the foreign keys
    problems::Entity::delete_by_id(problem.id)
        .exec(state.db())
        .await?;

    let images: Vec<String> = problem
        .image
        .iter()
        .cloned()
        .chain(
            HintKind::ALL
                .iter()
                .filter_map(|kind| kind.image(&problem).map(ToOwned::to_owned)),
        )
        .collect();

    remove_all(state.media(), &images).await;

    info!(problem_id = problem.id, "problem deleted");

    Ok(Json(json!({
        "message": "problem deleted",
        "redirect": "/problems/",
    })))
}
