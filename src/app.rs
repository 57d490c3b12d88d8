/*
 * Responsibility
 * - Config読み込み → 依存生成 (credential store / hasher / token service) → Router 組み立て
 * - Middleware の適用 (HTTP / CORS / security headers, Bearer は routes 側)
 * - axum::serve() で起動 (Ctrl-C で graceful shutdown)
 */
use anyhow::Result;
use axum::Router;
use std::{panic, process, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, DEFAULT_ADMIN_PASSWORD};
use crate::repos::{
    error::RepoError,
    user_repo::{InMemoryUserStore, PgUserStore, UserStore},
};
use crate::services::auth::{build_password_hasher, build_token_service};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,pdf_auth_api=debug,tower_http=debug cargo run
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
        // Always surface panics via tracing so they don't get "lost".
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        // Production: default hook, then CatchPanicLayer answers with a 500.
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

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

async fn build_store(config: &Config) -> Result<Arc<dyn UserStore>> {
    match &config.database_url {
        Some(url) => {
            let db = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            let store = PgUserStore::new(db);
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryUserStore::new())),
    }
}

async fn build_state(config: &Config) -> Result<AppState> {
    // Build process-level services here and inject them into the shared application state.
    let users = build_store(config).await?;
    let state = AppState::new(
        users,
        build_password_hasher(config),
        build_token_service(config),
    );

    tracing::info!(
        store = state.users.backend_name(),
        bcrypt_cost = state.passwords.cost(),
        "credential store ready"
    );

    seed_admin(&state, config).await?;
    Ok(state)
}

/// Create the admin account unless it already exists.
async fn seed_admin(state: &AppState, config: &Config) -> Result<()> {
    if state
        .users
        .find_by_username(&config.admin_username)
        .await?
        .is_some()
    {
        tracing::debug!(username = %config.admin_username, "admin user already present");
        return Ok(());
    }

    let password_hash = state.passwords.hash(&config.admin_password).await?;
    match state
        .users
        .create(&config.admin_username, &password_hash)
        .await
    {
        // Another instance seeded it first.
        Ok(_) | Err(RepoError::Conflict) => {}
        Err(err) => return Err(err.into()),
    }

    tracing::info!(username = %config.admin_username, "admin user created");
    if config.admin_password == DEFAULT_ADMIN_PASSWORD {
        tracing::warn!("admin user uses the default password; set ADMIN_PASSWORD");
    }
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(state.clone(), config).with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
