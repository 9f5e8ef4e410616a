use crate::services::auth::gate::RequestContext;

/// Extractor wrapper around the gate's per-request context.
///
/// The auth middleware inserts a RequestContext for every admitted request,
/// anonymous ones included, so handlers can rely on its presence.
#[derive(Debug, Clone)]
pub struct RequestCtx(pub RequestContext);
