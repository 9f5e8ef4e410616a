/*
 * Responsibility
 * - Load environment/config values (issuer, audience, scopes, upstream URL, ...)
 * - Validate them once at startup (missing required value => startup failure)
 * - Everything here is immutable for the process lifetime
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Trusted issuer; tokens must carry this exact `iss`.
    pub auth_issuer: Url,
    pub auth_audience: String,
    // Where the issuer publishes its signing keys. Defaults to `{issuer}/v1/keys`.
    pub auth_jwks_url: Url,
    pub required_scopes: Vec<String>,
    pub require_auth: bool,
    pub access_token_leeway_seconds: u64,
    pub jwks_refresh_ttl: Duration,

    pub upstream_url: Url,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth_issuer: Url = std::env::var("AUTH_ISSUER")
            .map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?
            .parse()
            .map_err(|_| ConfigError::Invalid("AUTH_ISSUER"))?;

        let auth_audience =
            std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "backend".to_string());

        // Okta-style default: the JWKS lives under the issuer.
        let auth_jwks_url: Url = match std::env::var("AUTH_JWKS_URL") {
            Ok(s) => s.parse().map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?,
            Err(_) => {
                let mut base = auth_issuer.clone();
                let joined = format!("{}/v1/keys", base.path().trim_end_matches('/'));
                base.set_path(&joined);
                base
            }
        };

        let required_scopes = std::env::var("REQUIRED_SCOPES")
            .unwrap_or_else(|_| "backend-api:read".to_string())
            .split_whitespace()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();

        let require_auth = std::env::var("REQUIRE_AUTH")
            .map(|v| v == "true")
            .unwrap_or(false);

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let jwks_refresh_ttl = std::env::var("JWKS_REFRESH_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(300));

        let upstream_url: Url = std::env::var("COUNTRIES_API_URL")
            .unwrap_or_else(|_| "https://countries.trevorblades.com/".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("COUNTRIES_API_URL"))?;

        let upstream_timeout = std::env::var("UPSTREAM_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth_issuer,
            auth_audience,
            auth_jwks_url,
            required_scopes,
            require_auth,
            access_token_leeway_seconds,
            jwks_refresh_ttl,
            upstream_url,
            upstream_timeout,
        })
    }
}
