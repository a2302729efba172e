/*
 * Responsibility
 * - Tracing / panic hook setup
 * - Config -> services -> Router assembly
 * - axum::serve() startup
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::middleware::http::HttpLimits;
use crate::services::access::{TokenBearer, TokenIssuer, TokenVerifier};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,area_guard=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, config.http);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let verifier = TokenVerifier::new(&config.jwt_secret, config.jwt_algorithm)
        .context("invalid ACCESS_JWT_SECRET for the configured algorithm")?
        .with_leeway(config.token_leeway_seconds);

    let algorithm = verifier.algorithm();
    let mut bearer = TokenBearer::new(config.token_source.clone(), verifier);
    if let Some(key) = &config.permissions_key {
        bearer = bearer.with_permissions_key(key.clone());
    }

    // With an asymmetric public key there is nothing to sign with; /set-cookies is then disabled.
    let issuer = match TokenIssuer::new(&config.jwt_secret, config.jwt_algorithm) {
        Ok(issuer) => Some(Arc::new(issuer)),
        Err(err) => {
            tracing::warn!(error = %err, "token issuing disabled");
            None
        }
    };

    tracing::info!(
        source = ?bearer.source(),
        permissions_key = ?bearer.permissions_key(),
        ?algorithm,
        "access control configured"
    );

    Ok(AppState::new(
        Arc::new(bearer),
        issuer,
        config.token_ttl_seconds,
    ))
}

pub fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    middleware::http::apply(router, limits)
}
