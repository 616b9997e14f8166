use super::{SessionResponse, AFTER_LOGIN};
use crate::{
    error::{self, DatabaseError, FieldErrors},
    handlers::GradeResponse,
    security::{password, session, session::CurrentUser},
    Json, Result, StateTrait,
};
use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use entity::{
    grades, user_profiles,
    users::{self, constraints::*},
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct Request {
    #[validate(length(min = 1, max = 150))]
    username: String,
    #[validate(email, length(max = 254))]
    email: String,
    password1: String,
    password2: String,
    grade: Option<i32>,
}

pub async fn signup_form<S: StateTrait>(
    State(state): State<S>,
    user: Option<CurrentUser>,
) -> Result<Json<Value>> {
    if user.is_some() {
        return Ok(Json(json!({
            "authenticated": true,
            "redirect": AFTER_LOGIN,
        })));
    }

    let grades: Vec<GradeResponse> = grades::Entity::find_ordered()
        .all(state.db())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(json!({
        "authenticated": false,
        "grades": grades,
    })))
}

pub async fn signup<S: StateTrait>(
    State(state): State<S>,
    Json(request): Json<Request>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let policy = &state.config().security;

    let mut fields = match request.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => FieldErrors::from(errors),
    };

    let username = request.username.trim();
    let email = request.email.trim();

    if username.is_empty() {
        if !fields.contains("username") {
            fields.add("username", "This field is required.");
        }
    } else if !is_valid_username(username) {
        fields.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    if request.password1 != request.password2 {
        fields.add("password2", "The two password fields didn't match.");
    } else {
        for message in password::validate_password(&request.password2, policy, &[username, email]) {
            fields.add("password2", message);
        }
    }

    match request.grade {
        None => fields.add("grade", "This field is required."),
        Some(grade) => {
            if grades::Entity::find_by_id(grade).one(state.db()).await?.is_none() {
                fields.add(
                    "grade",
                    "Select a valid choice. That choice is not one of the available choices.",
                );
            }
        }
    }

    if !fields.contains("username")
        && users::Entity::find_by_username(username)
            .one(state.db())
            .await?
            .is_some()
    {
        fields.add("username", "A user with that username already exists.");
    }

    if !fields.contains("email")
        && users::Entity::find_by_email(email)
            .one(state.db())
            .await?
            .is_some()
    {
        fields.add("email", "This email address is already registered.");
    }

    fields.into_result()?;

    let password_hash = password::hash_password(&request.password2, &mut state.rng())
        .map_err(|err| {
            error!("failed to hash password: {err}");
            error::INTERNAL
        })?;

    let now = Utc::now();
    let txn = state.db().begin().await?;

    let user = users::ActiveModel {
        username: Set(username.to_owned()),
        email: Set(email.to_owned()),
        password_hash: Set(password_hash),
        is_staff: Set(false),
        is_active: Set(true),
        date_joined: Set(now),
        last_login: Set(Some(now)),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|err| {
        // lost a race against a concurrent signup
        let field = if err.unique_violation(UC_USERS_USERNAME) {
            "username"
        } else if err.unique_violation(UC_USERS_EMAIL) {
            "email"
        } else {
            return error::Error::from(err);
        };

        let mut fields = FieldErrors::new();
        fields.add(field, "This value is already registered.");
        error::VALIDATION_FAILED.with_fields(fields)
    })?;

    user_profiles::ActiveModel {
        user_id: Set(user.id),
        grade_id: Set(request.grade),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    let token = session::start(state.db(), state.tokens(), policy, user.id).await?;

    info!(user_id = user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            username: user.username,
            redirect: AFTER_LOGIN,
        }),
    ))
}

fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}
