mod login;
mod logout;
mod signup;

use crate::state::StateTrait;
use axum::{routing::get, Router};
use serde::Serialize;

/// Routes for authentication
///
/// GET  /login/
/// POST /login/
/// GET  /logout/
/// POST /logout/
/// GET  /signup/
/// POST /signup/
pub fn routes<S: StateTrait>() -> Router<S> {
    Router::new()
        .route(
            "/login/",
            get(login::login_form).post(login::login::<S>),
        )
        .route(
            "/logout/",
            get(logout::logout::<S>).post(logout::logout::<S>),
        )
        .route(
            "/signup/",
            get(signup::signup_form::<S>).post(signup::signup::<S>),
        )
}

/// Returned after a successful login or signup.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub username: String,
    pub redirect: &'static str,
}

pub const AFTER_LOGIN: &str = "/problems/";
