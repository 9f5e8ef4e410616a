//! Scope (capability) extraction and matching.
//!
//! Pure functions: no I/O, no clock, deterministic. The issuer may encode
//! granted scopes either as a single space-separated string or as an array
//! of strings; both are normalized here.

use crate::services::auth::verifier::Claims;

/// Granted scopes from the `scp` claim. An absent claim is an empty grant,
/// not a rejection.
pub fn granted_scopes(claims: &Claims) -> Vec<String> {
    match claims.scp.as_ref() {
        None => Vec::new(),
        Some(serde_json::Value::String(s)) => {
            s.split_whitespace().map(|s| s.to_string()).collect()
        }
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.to_string())
            .collect(),
        // Any other shape carries no usable scopes.
        Some(_) => Vec::new(),
    }
}

/// True iff every required scope is granted. Exact, case-sensitive string
/// match; order does not matter. An empty requirement always passes.
pub fn satisfies(granted: &[String], required: &[String]) -> bool {
    required.iter().all(|r| granted.iter().any(|g| g == r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_scp(scp: Option<serde_json::Value>) -> Claims {
        serde_json::from_value(serde_json::json!({
            "iss": "https://issuer.example",
            "sub": "dev",
            "aud": "backend",
            "exp": 4_070_908_800u64,
            "scp": scp,
        }))
        .expect("claims must deserialize")
    }

    fn scopes(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn space_separated_string_is_split() {
        let claims = claims_with_scp(Some("backend-api:read backend-api:write".into()));
        assert_eq!(
            granted_scopes(&claims),
            scopes(&["backend-api:read", "backend-api:write"])
        );
    }

    #[test]
    fn array_is_used_as_is() {
        let claims = claims_with_scp(Some(serde_json::json!(["a", "b"])));
        assert_eq!(granted_scopes(&claims), scopes(&["a", "b"]));
    }

    #[test]
    fn absent_claim_is_empty_grant() {
        let claims = claims_with_scp(None);
        assert!(granted_scopes(&claims).is_empty());
    }

    #[test]
    fn satisfies_is_order_independent() {
        assert!(satisfies(&scopes(&["b", "a"]), &scopes(&["a", "b"])));
    }

    #[test]
    fn missing_required_scope_fails() {
        assert!(!satisfies(
            &scopes(&["backend-api:read"]),
            &scopes(&["backend-api:read", "backend-api:write"])
        ));
    }

    #[test]
    fn match_is_case_sensitive() {
        assert!(!satisfies(&scopes(&["Read"]), &scopes(&["read"])));
    }

    #[test]
    fn empty_requirement_always_passes() {
        assert!(satisfies(&[], &[]));
        assert!(satisfies(&scopes(&["anything"]), &[]));
    }
}
