mod session;

use crate::StateTrait;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{self, AUTHORIZATION},
        HeaderValue,
    },
    middleware, Router,
};
use std::iter;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::MakeRequestUuid,
    ServiceBuilderExt,
};

/// Upper bound for request bodies, large enough for a few photos of a
/// notebook page.
const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

pub fn middlewares<S: StateTrait>(state: S, router: Router<S>) -> Router {
    let cors_layer = cors_layer(&state.config().cors_allowed_origins);

    let middlewares = ServiceBuilder::new()
        .catch_panic()
        .sensitive_headers(iter::once(AUTHORIZATION))
        .set_x_request_id(MakeRequestUuid)
        .propagate_x_request_id()
        .trace_for_http()
        .override_response_header(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        )
        .override_response_header(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"))
        .override_response_header(
            header::REFERRER_POLICY,
            HeaderValue::from_static("same-origin"),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::get_session::<S>,
        ))
        .compression()
        .decompression()
        .layer(cors_layer)
        .into_inner();

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middlewares)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!("ignoring invalid CORS origin: {origin}"))
                .ok()
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
