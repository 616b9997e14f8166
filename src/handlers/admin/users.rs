use super::{grade_names, name_or_dash};
use crate::{
    error::{self, FieldErrors},
    extractors::Staff,
    Json, Result, StateTrait,
};
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use entity::{grades, user_profiles, users};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize)]
pub struct UserRow {
    id: i32,
    username: String,
    email: String,
    grade: String,
    is_staff: bool,
    is_active: bool,
    date_joined: DateTime<Utc>,
}

pub async fn list_users<S: StateTrait>(
    State(state): State<S>,
    _staff: Staff,
) -> Result<Json<Vec<UserRow>>> {
    let users = users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(state.db())
        .await?;

    let profiles: HashMap<i32, Option<i32>> = user_profiles::Entity::find()
        .all(state.db())
        .await?
        .into_iter()
        .map(|profile| (profile.user_id, profile.grade_id))
        .collect();

    let grades = grade_names(state.db()).await?;

    Ok(Json(
        users
            .into_iter()
            .map(|user| UserRow {
                grade: name_or_dash(&grades, profiles.get(&user.id).copied().flatten()),
                id: user.id,
                username: user.username,
                email: user.email,
                is_staff: user.is_staff,
                is_active: user.is_active,
                date_joined: user.date_joined,
            })
            .collect(),
    ))
}

#[derive(Deserialize)]
pub struct ProfileRequest {
    grade: Option<i32>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    user_id: i32,
    grade_id: Option<i32>,
}

/// Sets a user's grade. Users created before profiles existed get one here.
pub async fn update_profile<S: StateTrait>(
    State(state): State<S>,
    staff: Staff,
    Path(user_id): Path<i32>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let user = users::Entity::find_by_id(user_id)
        .one(state.db())
        .await?
        .ok_or(error::USER_NOT_FOUND)?;

    if let Some(grade) = request.grade {
        if grades::Entity::find_by_id(grade).one(state.db()).await?.is_none() {
            let mut fields = FieldErrors::new();
            fields.add("grade", "Select a valid choice. That choice is not one of the available choices.");
            return Err(error::VALIDATION_FAILED.with_fields(fields));
        }
    }

    let now = Utc::now();

    let profile = match user_profiles::Entity::find_by_user(user.id)
        .one(state.db())
        .await?
    {
        Some(profile) => {
            let mut profile = profile.into_active_model();
            profile.grade_id = Set(request.grade);
            profile.updated_at = Set(now);
            profile.update(state.db()).await?
        }
        None => {
            user_profiles::ActiveModel {
                user_id: Set(user.id),
                grade_id: Set(request.grade),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(state.db())
            .await?
        }
    };

    info!(staff_id = staff.id, user_id = user.id, "profile updated");

    Ok(Json(ProfileResponse {
        user_id: profile.user_id,
        grade_id: profile.grade_id,
    }))
}
