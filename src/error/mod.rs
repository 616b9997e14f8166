mod constants;
mod db;
mod fields;

pub use constants::*;
pub use db::*;
pub use fields::*;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::{BufMut, Bytes, BytesMut};
use sea_orm::DbErr;
use serde_json::json;

#[derive(Debug)]
pub struct Error<'a> {
    status: Option<StatusCode>,
    code: &'static str,
    message: &'a str,
    fields: Option<FieldErrors>,
}

pub type Result<T = ()> = std::result::Result<T, Error<'static>>;

impl<'a> Error<'a> {
    #[inline]
    const fn new(status: Option<StatusCode>, code: &'static str, message: &'a str) -> Error<'a> {
        Self {
            status,
            code,
            message,
            fields: None,
        }
    }

    /// Attaches field level messages, serialized under `fields`.
    #[inline]
    pub fn with_fields(mut self, fields: FieldErrors) -> Self {
        self.fields = Some(fields);
        self
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    #[inline]
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[inline]
    pub const fn message(&self) -> &str {
        self.message
    }

    #[inline]
    pub fn fields(&self) -> Option<&FieldErrors> {
        self.fields.as_ref()
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(128).writer();

        let mut body = json!({
            "code": self.code(),
            "error": self.message(),
        });

        if let Some(fields) = &self.fields {
            body["fields"] = json!(fields);
        }

        serde_json::to_writer(&mut buf, &body).expect("failed to serialize error");

        buf.into_inner().freeze()
    }
}

impl IntoResponse for Error<'_> {
    #[inline]
    fn into_response(self) -> Response {
        let status = self.status.unwrap_or_else(|| {
            error!("error without status reached a response: {}", self.code);
            StatusCode::INTERNAL_SERVER_ERROR
        });

        let buf = self.to_bytes();
        let mut res = (status, buf).into_response();

        res.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
        );

        res
    }
}

impl From<DbErr> for Error<'_> {
    #[inline]
    fn from(error: DbErr) -> Self {
        error!("database error: {:?}", error);
        constants::DATABASE_ERROR
    }
}

impl From<serde_json::Error> for Error<'_> {
    #[inline]
    fn from(error: serde_json::Error) -> Self {
        error!("json error: {:?}", error);
        constants::INTERNAL
    }
}

impl From<std::io::Error> for Error<'_> {
    #[inline]
    fn from(error: std::io::Error) -> Self {
        error!("io error: {:?}", error);
        constants::INTERNAL
    }
}

macro_rules! const_error {
    ($name:ident, $status:ident, $msg:literal) => {
        pub const $name: $crate::error::Error<'static> = $crate::error::Error::new(
            Some(::axum::http::StatusCode::$status),
            stringify!($name),
            $msg,
        );
    };
}

#[allow(clippy::useless_attribute)]
#[allow(clippy::needless_pub_self)]
pub(self) use const_error;
