//! Per-request admission: Authorization header in, RequestContext out.
//!
//! One decision per inbound request:
//! - no/malformed header  -> anonymous context, or 401 when auth is required
//! - Bearer token present -> verify; any failure is a 401 (a bad token is
//!   never silently downgraded to anonymous)
//! - verified             -> scope check; missing scopes are a 403 carrying
//!   the required and granted sets for diagnostics

use std::sync::Arc;

use crate::error::AppError;
use crate::services::auth::scopes;
use crate::services::auth::verifier::{Claims, TokenVerifier};

/// Immutable per-request authentication result, handed to every resolver.
///
/// Invariant: `authenticated == false` implies no claims and no token.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub authenticated: bool,
    pub claims: Option<Claims>,
    pub token: Option<String>,
}

impl RequestContext {
    fn anonymous() -> Self {
        Self::default()
    }

    fn with_claims(claims: Claims, token: String) -> Self {
        Self {
            authenticated: true,
            claims: Some(claims),
            token: Some(token),
        }
    }
}

pub struct AuthGate {
    verifier: Arc<TokenVerifier>,
    require_auth: bool,
    required_scopes: Vec<String>,
}

impl AuthGate {
    pub fn new(verifier: Arc<TokenVerifier>, require_auth: bool, required_scopes: Vec<String>) -> Self {
        Self {
            verifier,
            require_auth,
            required_scopes,
        }
    }

    /// Run the admission state machine for one request.
    pub async fn admit(&self, authorization: Option<&str>) -> Result<RequestContext, AppError> {
        let Some(token) = authorization.and_then(bearer_token) else {
            if self.require_auth {
                return Err(AppError::Unauthenticated(
                    "authentication required: provide a Bearer token",
                ));
            }
            tracing::debug!("unauthenticated request (allowed)");
            return Ok(RequestContext::anonymous());
        };

        let claims = match self.verifier.verify(token).await {
            Ok(claims) => claims,
            Err(err) => {
                tracing::warn!(error = %err, "token verification failed");
                return Err(AppError::Unauthenticated("invalid or expired token"));
            }
        };

        let granted = scopes::granted_scopes(&claims);
        if !scopes::satisfies(&granted, &self.required_scopes) {
            tracing::warn!(
                required = ?self.required_scopes,
                provided = ?granted,
                "missing required scopes"
            );
            return Err(AppError::Forbidden {
                required: self.required_scopes.clone(),
                provided: granted,
            });
        }

        tracing::debug!(
            sub = %claims.sub,
            aud = %claims.aud,
            iss = %claims.iss,
            scopes = ?granted,
            iat = ?claims.iat,
            exp = claims.exp,
            "authenticated request"
        );

        Ok(RequestContext::with_claims(claims, token.to_string()))
    }
}

// "Bearer <token>" or nothing. Anything else counts as absent; a header that
// does carry a Bearer token but fails verification is handled above.
fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
