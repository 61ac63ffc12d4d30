//! Router assembly and server startup.

use std::net::SocketAddr;

use {
    axum::{
        Router,
        http::StatusCode,
        response::{IntoResponse, Json, Response},
        routing::get,
    },
    serde_json::json,
    tower_http::cors::{Any, CorsLayer},
    tracing::{info, warn},
};

use atelier_config::AtelierConfig;

use crate::{
    auth_routes::auth_router, git_routes::git_router, nas_routes::nas_router,
    project_routes::project_router, settings_routes::settings_router, state::AppState,
};

// ── Router assembly ──────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/auth", auth_router())
        .nest("/api/projects", project_router())
        .nest("/api/settings", settings_router())
        .nest("/api/git", git_router())
        .nest("/api/nas", nas_router())
        .layer(cors)
        .with_state(state)
}

// ── Error rendering ──────────────────────────────────────────────────────────

/// Every error body has the same shape: `{ "error": <message> }`.
pub(crate) fn api_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Store failures surface as opaque 500s; the cause goes to the log.
pub(crate) fn store_error(err: atelier_store::Error) -> Response {
    warn!(error = %err, "store operation failed");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error")
}

/// Vault failures surface as opaque 500s; the cause goes to the log.
pub(crate) fn vault_error(err: atelier_vault::VaultError) -> Response {
    warn!(error = %err, "vault operation failed");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Encryption error")
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Bind and serve until the process is stopped.
pub async fn serve(config: &AtelierConfig) -> anyhow::Result<()> {
    if !config.auth.has_secret() {
        warn!("no [auth] secret configured; sealing credentials with the built-in dev key");
    }

    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}
