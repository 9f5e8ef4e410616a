use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::gate::RequestContext;
use crate::state::AppState;

use super::RequestCtx;

/// Requires the auth middleware to have inserted a RequestContext into
/// request.extensions(). A miss means the route was wired without the gate,
/// which we treat as a server-side configuration error.
impl FromRequestParts<AppState> for RequestCtx
where
    AppState: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(RequestCtx)
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
