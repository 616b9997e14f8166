use super::{SessionResponse, AFTER_LOGIN};
use crate::{
    config::SecurityPolicy,
    error,
    security::{password, session, session::CurrentUser},
    Json, Result, StateTrait, ValidatedJson,
};
use axum::extract::State;
use chrono::{DateTime, Utc};
use entity::{login_attempts, users};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct Request {
    #[validate(length(min = 1, max = 150))]
    username: String,
    #[validate(length(min = 1))]
    password: String,
}

pub async fn login_form(user: Option<CurrentUser>) -> Json<Value> {
    Json(json!({
        "authenticated": user.is_some(),
        "redirect": user.map(|_| AFTER_LOGIN),
    }))
}

pub async fn login<S: StateTrait>(
    State(state): State<S>,
    ValidatedJson(request): ValidatedJson<Request>,
) -> Result<Json<SessionResponse>> {
    let policy = &state.config().security;
    let now = Utc::now();

    let attempt = login_attempts::Entity::find_by_id(request.username.clone())
        .one(state.db())
        .await?;

    if attempt
        .as_ref()
        .and_then(|attempt| attempt.locked_until)
        .is_some_and(|locked_until| locked_until > now)
    {
        warn!(username = request.username, "login attempt on a locked account");
        return Err(error::ACCOUNT_LOCKED);
    }

    let user = users::Entity::find_by_username(&request.username)
        .one(state.db())
        .await?
        .filter(|user| user.is_active)
        .filter(|user| password::verify_password(&request.password, &user.password_hash));

    let Some(user) = user else {
        let locked =
            record_failure(state.db(), policy, &request.username, attempt, now).await?;

        return if locked {
            warn!(username = request.username, "account locked after failed logins");
            Err(error::ACCOUNT_LOCKED)
        } else {
            Err(error::INVALID_CREDENTIALS)
        };
    };

    if attempt.is_some() {
        login_attempts::Entity::delete_by_id(request.username.clone())
            .exec(state.db())
            .await?;
    }

    let username = user.username.clone();
    let user_id = user.id;

    let mut active_user = user.into_active_model();
    active_user.last_login = Set(Some(now));
    active_user.update(state.db()).await?;

    let token = session::start(state.db(), state.tokens(), policy, user_id).await?;

    info!(user_id, "user logged in");

    Ok(Json(SessionResponse {
        token,
        username,
        redirect: AFTER_LOGIN,
    }))
}

/// Counts a failed login and returns whether the username is now locked.
async fn record_failure<C: ConnectionTrait>(
    db: &C,
    policy: &SecurityPolicy,
    username: &str,
    attempt: Option<login_attempts::Model>,
    now: DateTime<Utc>,
) -> Result<bool> {
    // failures older than the cooldown, or an expired lock, start a fresh count
    let stale = now - policy.login_cooldown;
    let failures = match &attempt {
        Some(attempt) if attempt.locked_until.is_none() && attempt.last_failure > stale => {
            attempt.failures + 1
        }
        _ => 1,
    };

    prune_stale(db, username, stale, now).await?;

    let locked_until = (failures >= policy.login_failure_limit).then(|| now + policy.login_cooldown);

    match attempt {
        Some(attempt) => {
            let mut attempt = attempt.into_active_model();
            attempt.failures = Set(failures);
            attempt.last_failure = Set(now);
            attempt.locked_until = Set(locked_until);
            attempt.update(db).await?;
        }
        None => {
            login_attempts::ActiveModel {
                username: Set(username.to_owned()),
                failures: Set(failures),
                last_failure: Set(now),
                locked_until: Set(locked_until),
            }
            .insert(db)
            .await?;
        }
    }

    Ok(locked_until.is_some())
}

/// Drops counters that no longer count towards a lock, except `keep`'s own.
async fn prune_stale<C: ConnectionTrait>(
    db: &C,
    keep: &str,
    stale: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<u64> {
    let result = login_attempts::Entity::delete_many()
        .filter(login_attempts::Column::Username.ne(keep))
        .filter(
            Condition::any()
                .add(login_attempts::Column::LockedUntil.lte(now))
                .add(
                    Condition::all()
                        .add(login_attempts::Column::LockedUntil.is_null())
                        .add(login_attempts::Column::LastFailure.lte(stale)),
                ),
        )
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        debug!(rows = result.rows_affected, "pruned stale login attempts");
    }

    Ok(result.rows_affected)
}
