use crate::{
    security::session::{self, CurrentUser},
    Json, Result, StateTrait,
};
use axum::extract::State;
use serde_json::{json, Value};

pub async fn logout<S: StateTrait>(
    State(state): State<S>,
    user: Option<CurrentUser>,
) -> Result<Json<Value>> {
    if let Some(user) = user {
        session::end(state.db(), user.session_id).await?;
        info!(user_id = user.id, "user logged out");
    }

    Ok(Json(json!({
        "message": "logged out",
        "redirect": "/login/",
    })))
}
