use crate::{error, security::session::CurrentUser, Error};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use entity::users;
use std::ops::Deref;

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(error::NOT_AUTHENTICATED)
    }
}

impl Deref for CurrentUser {
    type Target = users::Model;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

/// An authenticated user with the staff flag.
pub struct Staff(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for Staff
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        if !user.is_staff {
            warn!(user_id = user.id, "non-staff user tried to use the admin api");
            return Err(error::NOT_STAFF);
        }

        Ok(Staff(user))
    }
}

impl Deref for Staff {
    type Target = users::Model;

    fn deref(&self) -> &Self::Target {
        &self.0.user
    }
}
