//! RS256 access-token verification against the issuer's JWKS.
//!
//! The JWKS is fetched lazily and cached behind a `tokio::sync::RwLock`:
//! concurrent reads during normal operation, exclusive refresh on an unknown
//! `kid` (key rotation). A request never observes a half-updated key set.

use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use url::Url;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("jwt verification failed: {0}")]
    Jwt(jsonwebtoken::errors::Error),

    #[error("invalid JWT header")]
    Header,

    #[error("unsupported JWT alg (expected RS256)")]
    Alg,

    #[error("JWT header missing kid")]
    MissingKid,

    #[error("signing key '{0}' not found in JWKS")]
    UnknownKid(String),

    #[error("failed to parse JWK decoding key")]
    BadJwk,

    #[error("failed to fetch JWKS: {0}")]
    KeyFetch(String),

    #[error("static JWKS JSON is invalid")]
    BadJwksJson,
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Verified access-token claims.
///
/// NOTE:
/// - `aud` can be either a string or an array; `Validation::set_audience`
///   handles both, so we keep it as a raw Value.
/// - `scp` is either a space-separated string or an array of strings
///   depending on the issuer; extraction lives in `scopes.rs`.
/// - Timestamps stay as integer seconds since epoch.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub iss: String,
    #[serde(default)]
    pub aud: serde_json::Value,

    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub iat: Option<u64>,
    #[serde(default)]
    pub nbf: Option<u64>,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub cid: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,

    #[serde(default)]
    pub scp: Option<serde_json::Value>,

    // Anything the issuer adds beyond the standard claims.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub issuer: String,
    pub audience: String,
    /// Fetched when no static JWKS is configured.
    pub jwks_url: Option<Url>,
    /// Static JWKS JSON (tests / air-gapped setups); takes precedence.
    pub jwks_json: Option<String>,
    pub leeway_seconds: u64,
    /// Minimum cache age before an unknown `kid` triggers a re-fetch.
    pub refresh_ttl: Duration,
    pub fetch_timeout: Duration,
}

pub struct TokenVerifier {
    config: VerifierConfig,
    http: reqwest::Client,
    validation: Validation,
    jwks: RwLock<JwksCache>,
}

#[derive(Debug)]
struct JwksCache {
    keys: Option<JwkSet>,
    fetched_at: Option<Instant>,
}

impl TokenVerifier {
    pub fn new(config: VerifierConfig) -> Result<Self, VerifyError> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| VerifyError::KeyFetch(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.leeway = config.leeway_seconds;
        // `nbf` is optional in tokens but must be honored when present.
        validation.validate_nbf = true;

        Ok(Self {
            config,
            http,
            validation,
            jwks: RwLock::new(JwksCache {
                keys: None,
                fetched_at: None,
            }),
        })
    }

    /// Verify signature, `iss`, `aud`, `exp` and (if present) `nbf`, then
    /// return the full claim set. Verification failures are terminal; only
    /// the JWKS *fetch* is retried (bounded) inside the cache.
    pub async fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let header = decode_header(token).map_err(|_| VerifyError::Header)?;

        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::Alg);
        }

        let kid = header.kid.ok_or(VerifyError::MissingKid)?;
        let decoding_key = self.decoding_key_for_kid(&kid).await?;

        let data = decode::<Claims>(token, &decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    async fn decoding_key_for_kid(&self, kid: &str) -> Result<DecodingKey, VerifyError> {
        {
            let cache = self.jwks.read().await;
            if let Some(jwk) = cache.jwk_for_kid(kid) {
                return DecodingKey::from_jwk(jwk).map_err(|_| VerifyError::BadJwk);
            }
        }

        // Unknown kid: maybe the issuer rotated keys. Refresh at most once
        // per TTL window so a flood of bad tokens cannot hammer the issuer.
        {
            let mut cache = self.jwks.write().await;
            let refresh_needed = cache
                .fetched_at
                .map(|t| t.elapsed() > self.config.refresh_ttl)
                .unwrap_or(true);
            if refresh_needed {
                cache.refresh(&self.http, &self.config).await?;
            }

            if let Some(jwk) = cache.jwk_for_kid(kid) {
                return DecodingKey::from_jwk(jwk).map_err(|_| VerifyError::BadJwk);
            }
        }

        Err(VerifyError::UnknownKid(kid.to_string()))
    }
}

impl JwksCache {
    fn jwk_for_kid(&self, kid: &str) -> Option<&jsonwebtoken::jwk::Jwk> {
        self.keys.as_ref()?.find(kid)
    }

    async fn refresh(
        &mut self,
        http: &reqwest::Client,
        config: &VerifierConfig,
    ) -> Result<(), VerifyError> {
        let keys = if let Some(jwks_json) = config.jwks_json.as_ref() {
            serde_json::from_str::<JwkSet>(jwks_json).map_err(|_| VerifyError::BadJwksJson)?
        } else if let Some(url) = config.jwks_url.as_ref() {
            fetch_jwks(http, url).await?
        } else {
            return Err(VerifyError::KeyFetch(
                "no JWKS URL or static JWKS configured".to_string(),
            ));
        };

        self.keys = Some(keys);
        self.fetched_at = Some(Instant::now());
        Ok(())
    }
}

const JWKS_FETCH_ATTEMPTS: u32 = 2;

// Network fetch of the signing keys. Transient failures get one bounded
// retry before surfacing as a verification failure.
async fn fetch_jwks(http: &reqwest::Client, url: &Url) -> Result<JwkSet, VerifyError> {
    let mut last_err = None;

    for attempt in 1..=JWKS_FETCH_ATTEMPTS {
        match try_fetch_jwks(http, url).await {
            Ok(keys) => return Ok(keys),
            Err(e) => {
                tracing::warn!(attempt, error = %e, "JWKS fetch failed");
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| VerifyError::KeyFetch("unreachable".to_string())))
}

async fn try_fetch_jwks(http: &reqwest::Client, url: &Url) -> Result<JwkSet, VerifyError> {
    http.get(url.clone())
        .send()
        .await
        .map_err(|e| VerifyError::KeyFetch(e.to_string()))?
        .error_for_status()
        .map_err(|e| VerifyError::KeyFetch(e.to_string()))?
        .json::<JwkSet>()
        .await
        .map_err(|e| VerifyError::KeyFetch(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier_with_empty_jwks() -> TokenVerifier {
        TokenVerifier::new(VerifierConfig {
            issuer: "https://issuer.example".to_string(),
            audience: "backend".to_string(),
            jwks_url: None,
            jwks_json: Some(r#"{"keys":[]}"#.to_string()),
            leeway_seconds: 0,
            refresh_ttl: Duration::from_secs(300),
            fetch_timeout: Duration::from_secs(2),
        })
        .expect("verifier should build")
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_without_key_lookup() {
        let verifier = verifier_with_empty_jwks();
        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, VerifyError::Header));
    }

    #[tokio::test]
    async fn unknown_kid_is_rejected() {
        let verifier = verifier_with_empty_jwks();

        let mut header = jsonwebtoken::Header::new(Algorithm::RS256);
        header.kid = Some("nope".to_string());
        let key = jsonwebtoken::EncodingKey::from_rsa_pem(include_bytes!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/test_rsa_private.pem"
        )))
        .expect("fixture key must parse");
        let claims = serde_json::json!({
            "iss": "https://issuer.example",
            "sub": "dev",
            "aud": "backend",
            "exp": 4_070_908_800u64,
        });
        let token = jsonwebtoken::encode(&header, &claims, &key).expect("encode");

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::UnknownKid(kid) if kid == "nope"));
    }
}
