//! Auth gate middleware: Authorization header -> RequestContext in extensions.
//!
//! The gate decides admit/reject once per request. Handlers receive the
//! resulting RequestContext through the `RequestCtx` extractor; they never
//! re-run authorization themselves.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Apply the auth gate to every route in the given router.
///
/// Example:
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8: from_fn cannot take a State extractor, so pass state explicitly
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let ctx = state.gate.admit(authorization.as_deref()).await?;

    // middleware -> extractor hand-off
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
