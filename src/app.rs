/*
 * Responsibility
 * - tracing / panic hook 初期化
 * - Config読み込み → AppState (AuthPolicy) 生成 → Router 組み立て
 * - Middleware の適用 (realm ごとの gate, HTTP 共通 layer)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::middleware::http::HttpLimits;
use crate::{api, config::Config, error::AppError, middleware, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,sky_server=debug,tower_http=debug cargo run
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
        // Always surface panics via tracing so they don't get lost.
        tracing::error!(?info, "panic");

        // Development: fail fast. Production: default hook, keep serving.
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
        admin_header = %config.admin_jwt.token_name,
        user_header = %config.user_jwt.token_name,
        leeway_seconds = config.jwt_leeway_seconds,
        "starting sky-server in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = AppState::from_config(&config);
    let app = build_router(state, HttpLimits::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState, limits: HttpLimits) -> Router {
    async fn fallback() -> AppError {
        AppError::not_found("route")
    }

    let router = api::routes(&state).fallback(fallback).with_state(state);

    middleware::http::apply(router, limits)
}
