/*
 * Responsibility
 * - Authentication/authorization services
 * - verifier: JWT signature + claim validation against the issuer's JWKS
 * - scopes:   granted-capability extraction and matching (pure)
 * - gate:     per-request admission state machine -> RequestContext
 */
pub mod gate;
pub mod scopes;
pub mod verifier;
