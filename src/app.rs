/*
 * Responsibility
 * - Config load -> service construction -> Router assembly
 * - Middleware application (auth gate / CORS / HTTP plumbing)
 * - axum::serve() startup
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::gate::AuthGate;
use crate::services::auth::verifier::{TokenVerifier, VerifierConfig};
use crate::services::countries::client::CountriesClient;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,countries_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get lost
        // (stderr can be hidden depending on how the process is launched).
        tracing::error!(?info, "panic");

        // In development, fail fast so we notice immediately. In production,
        // prefer the default behavior and let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting gateway in {:?} mode on {} (issuer: {}, audience: {}, auth {})",
        config.app_env,
        config.addr,
        config.auth_issuer,
        config.auth_audience,
        if config.require_auth {
            "REQUIRED"
        } else {
            "OPTIONAL"
        }
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    // Process-level services, injected into the shared application state.
    let verifier = TokenVerifier::new(VerifierConfig {
        issuer: config.auth_issuer.as_str().trim_end_matches('/').to_string(),
        audience: config.auth_audience.clone(),
        jwks_url: Some(config.auth_jwks_url.clone()),
        jwks_json: None,
        leeway_seconds: config.access_token_leeway_seconds,
        refresh_ttl: config.jwks_refresh_ttl,
        fetch_timeout: config.upstream_timeout,
    })?;

    let gate = Arc::new(AuthGate::new(
        Arc::new(verifier),
        config.require_auth,
        config.required_scopes.clone(),
    ));

    let countries = Arc::new(CountriesClient::new(
        config.upstream_url.clone(),
        config.upstream_timeout,
    )?);

    Ok(AppState::new(gate, countries))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = api::v1::routes();
    let v1 = middleware::auth::access::apply(v1, state.clone());

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", v1)
        .with_state(state);

    let app = middleware::cors::apply(app, config);
    middleware::http::apply(app)
}
