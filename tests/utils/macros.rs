#[allow(unused_macros)]
macro_rules! assert_error {
    ($res:expr, $error:expr) => {{
        assert_eq!(Some($res.status()), $error.status());

        let res_json: serde_json::Value = $res.json().await;
        assert_eq!(res_json["code"], $error.code());
    }};
}

#[allow(unused_imports)]
pub(crate) use assert_error;

/// Like `assert_error!`, but also checks that `field` carries a message.
#[allow(unused_macros)]
macro_rules! assert_field_error {
    ($res:expr, $field:literal) => {{
        assert_eq!($res.status(), http::StatusCode::BAD_REQUEST);

        let res_json: serde_json::Value = $res.json().await;
        assert_eq!(res_json["code"], "VALIDATION_FAILED");
        assert!(
            res_json["fields"][$field].is_array(),
            "no error for `{}` in {}",
            $field,
            res_json
        );
        res_json
    }};
}

#[allow(unused_imports)]
pub(crate) use assert_field_error;

#[allow(unused_macros)]
macro_rules! enable_logging {
    ($level:ident) => {{
        use ::tracing::level_filters::LevelFilter;
        use ::tracing_subscriber::{
            layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
        };

        let env_filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::$level.into())
            .from_env_lossy();

        ::tracing_subscriber::registry()
            .with(
                ::tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_line_number(true)
                    .with_filter(env_filter),
            )
            .init();
    }};
}

#[allow(unused_imports)]
pub(crate) use enable_logging;
