use super::{find_owned, with_tags_one};
use crate::{
    handlers::GradeResponse, security::session::CurrentUser, Json, Result, StateTrait,
};
use axum::extract::{Path, State};
use entity::grades;
use sea_orm::EntityTrait;
use serde_json::{json, Value};

pub async fn get_problem<S: StateTrait>(
    State(state): State<S>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let problem = find_owned(state.db(), user.id, id).await?;

    let grade = match problem.grade_id {
        Some(grade_id) => grades::Entity::find_by_id(grade_id)
            .one(state.db())
            .await?
            .map(GradeResponse::from),
        None => None,
    };

    let problem = with_tags_one(state.db(), problem).await?;

    Ok(Json(json!({
        "problem": problem,
        "grade": grade,
    })))
}
