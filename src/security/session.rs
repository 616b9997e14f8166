//! Server side sessions backing the bearer tokens.

use super::{Claims, TokenKeys};
use crate::{config::SecurityPolicy, error, Result};
use chrono::Utc;
use entity::{sessions, users};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

/// The user behind an authenticated request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: users::Model,
    pub session_id: Uuid,
}

/// Creates a session row for `user_id` and returns the signed token.
pub async fn start<C: ConnectionTrait>(
    db: &C,
    tokens: &TokenKeys,
    policy: &SecurityPolicy,
    user_id: i32,
) -> Result<String> {
    let now = Utc::now();
    let id = Uuid::new_v4();

    sessions::ActiveModel {
        id: Set(id),
        user_id: Set(user_id),
        created_at: Set(now),
        expires_at: Set(now + policy.session_ttl),
    }
    .insert(db)
    .await?;

    let claims = Claims {
        sub: user_id,
        sid: id,
        iat: now.timestamp(),
        exp: (now + policy.session_max_age).timestamp(),
    };

    tokens.encode(&claims).map_err(|err| {
        error!("failed to encode session token: {err}");
        error::INTERNAL
    })
}

/// Resolves a bearer token to its user, pushing the sliding expiry forward.
/// Returns `None` for anything that does not name a live session.
pub async fn resolve<C: ConnectionTrait>(
    db: &C,
    tokens: &TokenKeys,
    policy: &SecurityPolicy,
    token: &str,
) -> Result<Option<CurrentUser>> {
    let Ok(claims) = tokens.decode(token) else {
        debug!("rejected undecodable session token");
        return Ok(None);
    };

    let Some(session) = sessions::Entity::find_by_id(claims.sid).one(db).await? else {
        return Ok(None);
    };

    if session.user_id != claims.sub {
        warn!(session = %session.id, "token subject does not match session owner");
        return Ok(None);
    }

    let now = Utc::now();

    if session.expires_at <= now {
        sessions::Entity::delete_by_id(session.id).exec(db).await?;
        return Ok(None);
    }

    let Some(user) = users::Entity::find_by_id(session.user_id).one(db).await? else {
        return Ok(None);
    };

    if !user.is_active {
        return Ok(None);
    }

    let session_id = session.id;
    let mut session = session.into_active_model();
    session.expires_at = Set(now + policy.session_ttl);
    session.update(db).await?;

    Ok(Some(CurrentUser { user, session_id }))
}

pub async fn end<C: ConnectionTrait>(db: &C, session_id: Uuid) -> Result {
    sessions::Entity::delete_by_id(session_id).exec(db).await?;
    Ok(())
}
