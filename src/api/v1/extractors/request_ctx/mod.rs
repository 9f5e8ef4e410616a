/*!
 * Request-context extractor
 *
 * Responsibility:
 * - Hand the gate's RequestContext (authenticated or anonymous) to handlers
 * - HTTP / axum wiring stays in core; the type itself lives in types
 *
 * Public API:
 * - RequestCtx
 */

mod core;
mod types;

pub use types::RequestCtx;
