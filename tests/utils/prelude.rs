#![allow(unused_imports)]

pub(crate) use super::macros::*;
pub use super::{
    request::*,
    response::*,
    setup::{setup, setup_with_failing_mail, Env},
    user::{png_part, User, UserLike},
    PNG,
};
pub use assert_json_diff::{assert_json_eq, assert_json_include};
pub use http::StatusCode;
pub use mathhint_backend::error;
pub use reqwest::multipart::{Form, Part};
pub use serde_json::{json, Value};
