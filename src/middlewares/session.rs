use crate::{security::session, StateTrait};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tracing::Instrument;

/// Resolves the bearer token, if any, and stores the `CurrentUser` in the
/// request extensions. Requests with a missing or dead token pass through
/// anonymously; protected handlers reject them through the extractor.
pub async fn get_session<S: StateTrait>(
    State(state): State<S>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(header) = request.headers().typed_get::<Authorization<Bearer>>() else {
        return next.run(request).await;
    };

    let user = match session::resolve(
        state.db(),
        state.tokens(),
        &state.config().security,
        header.token(),
    )
    .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return next.run(request).await,
        Err(error) => return error.into_response(),
    };

    let span = info_span!("session", user_id = user.user.id);

    request.extensions_mut().insert(user);

    next.run(request).instrument(span).await
}
