//! `/api/git` routes: provider linkage (connect, status, disconnect) and
//! repository import.

use {
    axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    secrecy::Secret,
    serde::Deserialize,
    serde_json::json,
    tracing::warn,
};

use {
    atelier_git::{GitCredentials, GitProvider, fetch_readme_first_line, verify_connection},
    atelier_store::ProviderSettings,
    atelier_vault::{Vault, VaultError},
};

use crate::{
    auth_middleware::CurrentUser,
    server::{api_error, store_error, vault_error},
    state::AppState,
};

/// Fallback host stored for gitlab linkages configured without a base URL.
const GITLAB_PUBLIC: &str = "https://gitlab.com";

/// Build the git router with all `/api/git/*` routes.
pub fn git_router() -> Router<AppState> {
    Router::new()
        .route(
            "/connect/{provider}",
            post(connect_handler).delete(disconnect_handler),
        )
        .route("/status", get(status_handler))
        .route("/import", post(import_handler))
}

// ── Connect / disconnect ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectBody {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
}

async fn connect_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(body): Json<ConnectBody>,
) -> Response {
    let provider = match provider.parse::<GitProvider>() {
        Ok(p) => p,
        Err(_) => {
            return api_error(
                StatusCode::BAD_REQUEST,
                &format!("Unknown git provider: {provider}"),
            );
        },
    };

    // Verification uses exactly what the request carries; stored
    // credentials only come into play for status and import.
    let creds = GitCredentials {
        provider,
        base_url: body.base_url.clone(),
        username: body.username.clone(),
        password: body.password.clone().map(Secret::new),
        token: body.token.clone().map(Secret::new),
    };
    let outcome = verify_connection(&state.http, &creds).await;
    if !outcome.ok {
        return api_error(
            StatusCode::BAD_REQUEST,
            &format!("Git auth failed: {}", outcome.status),
        );
    }

    let mut settings = match state.store.user_settings(&user.id).await {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => return store_error(e),
    };
    if let Err(e) = store_credentials(&state.vault, settings.provider_mut(provider), provider, body)
    {
        return vault_error(e);
    }
    if let Err(e) = state.store.set_user_settings(&user.id, settings).await {
        return store_error(e);
    }

    Json(json!({ "connected": true, "provider": provider })).into_response()
}

/// Persist verified credentials into the provider slot and mark it
/// connected. GitHub keeps no base URL; gitlab falls back to the public
/// host; gitea records whatever base URL the request carried. Basic
/// credentials for self-hosted providers only make sense as a pair.
fn store_credentials(
    vault: &Vault,
    slot: &mut ProviderSettings,
    provider: GitProvider,
    body: ConnectBody,
) -> Result<(), VaultError> {
    let base_url = body.base_url.filter(|v| !v.is_empty());
    let username = body.username.filter(|v| !v.is_empty());
    let password = body.password.filter(|v| !v.is_empty());
    let token = body.token.filter(|v| !v.is_empty());

    match provider {
        GitProvider::Github => {
            if let Some(username) = username {
                slot.username = Some(username);
            }
            if let Some(password) = password {
                slot.password_enc = Some(vault.encrypt_string(&password)?);
            }
            if let Some(token) = token {
                slot.token_enc = Some(vault.encrypt_string(&token)?);
            }
        },
        GitProvider::Gitea | GitProvider::Gitlab => {
            slot.base_url = if provider == GitProvider::Gitlab {
                base_url.or_else(|| Some(GITLAB_PUBLIC.to_string()))
            } else {
                base_url
            };
            if let Some(token) = token {
                slot.token_enc = Some(vault.encrypt_string(&token)?);
            }
            if let (Some(username), Some(password)) = (username, password) {
                slot.username = Some(username);
                slot.password_enc = Some(vault.encrypt_string(&password)?);
            }
        },
    }
    slot.connected = true;
    Ok(())
}

async fn disconnect_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Response {
    let provider = match provider.parse::<GitProvider>() {
        Ok(p) => p,
        Err(_) => {
            return api_error(
                StatusCode::BAD_REQUEST,
                &format!("Unknown git provider: {provider}"),
            );
        },
    };

    let mut settings = match state.store.user_settings(&user.id).await {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => return store_error(e),
    };
    settings.provider_mut(provider).connected = false;
    if let Err(e) = state.store.set_user_settings(&user.id, settings).await {
        return store_error(e);
    }

    Json(json!({ "connected": false })).into_response()
}

// ── Status ───────────────────────────────────────────────────────────────────

async fn status_handler(user: CurrentUser, State(state): State<AppState>) -> Response {
    let mut settings = match state.store.user_settings(&user.id).await {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => return store_error(e),
    };

    let (github, gitea, gitlab) = tokio::join!(
        verify_stored(&state, &settings.github, GitProvider::Github),
        verify_stored(&state, &settings.gitea, GitProvider::Gitea),
        verify_stored(&state, &settings.gitlab, GitProvider::Gitlab),
    );

    settings.github.connected = github;
    settings.gitea.connected = gitea;
    settings.gitlab.connected = gitlab;
    if let Err(e) = state.store.set_user_settings(&user.id, settings).await {
        return store_error(e);
    }

    Json(json!({
        "connected": { "github": github, "gitea": gitea, "gitlab": gitlab },
    }))
    .into_response()
}

/// Re-verify one provider from its stored credentials. Slots without
/// credentials report disconnected without a network call.
async fn verify_stored(state: &AppState, slot: &ProviderSettings, provider: GitProvider) -> bool {
    if !slot.has_credentials() {
        return false;
    }
    let creds = stored_credentials(&state.vault, slot, provider);
    verify_connection(&state.http, &creds).await.ok
}

// ── Import ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportBody {
    url: Option<String>,
    provider: Option<GitProvider>,
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
    project_id: Option<String>,
}

async fn import_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<ImportBody>,
) -> Response {
    let url = match body.url.filter(|u| !u.is_empty()) {
        Some(url) => url,
        None => return api_error(StatusCode::BAD_REQUEST, "Missing url"),
    };
    let provider = body.provider.unwrap_or(GitProvider::Github);

    let settings = match state.store.user_settings(&user.id).await {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => return store_error(e),
    };
    let slot = settings.provider(provider);

    // Request fields win over stored ones, field by field.
    let creds = GitCredentials {
        provider,
        base_url: body
            .base_url
            .filter(|v| !v.is_empty())
            .or_else(|| slot.base_url.clone()),
        username: body
            .username
            .filter(|v| !v.is_empty())
            .or_else(|| slot.username.clone()),
        password: body
            .password
            .filter(|v| !v.is_empty())
            .map(Secret::new)
            .or_else(|| unseal_opt(&state.vault, slot.password_enc.as_ref())),
        token: body
            .token
            .filter(|v| !v.is_empty())
            .map(Secret::new)
            .or_else(|| unseal_opt(&state.vault, slot.token_enc.as_ref())),
    };

    let description = match fetch_readme_first_line(&state.http, &creds, &url).await {
        Some(line) if !line.is_empty() => line,
        _ => return api_error(StatusCode::BAD_REQUEST, "Failed to fetch README"),
    };

    // Optionally write the description straight onto an existing project.
    if let Some(project_id) = body.project_id.filter(|id| !id.is_empty()) {
        match state.store.project(&user.id, &project_id).await {
            Ok(Some(mut project)) => {
                project.description = description.clone();
                if let Err(e) = state.store.upsert_project(project).await {
                    return store_error(e);
                }
            },
            Ok(None) => {},
            Err(e) => return store_error(e),
        }
    }

    Json(json!({ "description": description })).into_response()
}

// ── Stored credential helpers ────────────────────────────────────────────────

/// Rebuild credentials from a provider slot, unsealing stored secrets.
fn stored_credentials(
    vault: &Vault,
    slot: &ProviderSettings,
    provider: GitProvider,
) -> GitCredentials {
    GitCredentials {
        provider,
        base_url: slot.base_url.clone(),
        username: slot.username.clone(),
        password: unseal_opt(vault, slot.password_enc.as_ref()),
        token: unseal_opt(vault, slot.token_enc.as_ref()),
    }
}

/// Unseal a stored blob. A blob that cannot be opened (secret changed,
/// file edited by hand) degrades to an absent credential.
fn unseal_opt(vault: &Vault, sealed: Option<&String>) -> Option<Secret<String>> {
    let blob = sealed?;
    match vault.decrypt_string(blob) {
        Ok(plain) => Some(Secret::new(plain)),
        Err(e) => {
            warn!(error = %e, "stored credential cannot be unsealed, treating as absent");
            None
        },
    }
}
