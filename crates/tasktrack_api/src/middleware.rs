//! Bearer session authentication for protected routes.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use log::debug;
use tasktrack_core::service::identity_service::resolve_session;
use tasktrack_core::{ServiceError, SessionError};

/// Resolves the bearer token into a `Caller` request extension, or rejects
/// with 401.
pub(crate) async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()) else {
        debug!(
            "event=session_rejected module=api path={} reason=missing_token",
            request.uri().path()
        );
        return Err(ServiceError::Unauthorized(SessionError::Malformed(
            "missing bearer token".to_string(),
        ))
        .into());
    };

    let caller = resolve_session(state.sessions(), token)?;
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
