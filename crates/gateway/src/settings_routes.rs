//! `/api/settings` routes: per-user preferences and the redacted view of
//! stored credentials.

use {
    axum::{
        Json, Router,
        extract::State,
        response::{IntoResponse, Response},
        routing::get,
    },
    serde::{Deserialize, Serialize},
    serde_json::json,
};

use {
    atelier_projects::ConnectionType,
    atelier_store::{ProviderSettings, UserSettings},
};

use crate::{
    auth_middleware::CurrentUser,
    server::{store_error, vault_error},
    state::AppState,
};

/// Build the settings router.
pub fn settings_router() -> Router<AppState> {
    Router::new().route("/", get(get_settings_handler).post(update_settings_handler))
}

// ── Redacted views ───────────────────────────────────────────────────────────

/// What clients see for one provider: sealed blobs become presence flags.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProviderView {
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    has_password: bool,
    has_token: bool,
    connected: bool,
}

impl From<&ProviderSettings> for ProviderView {
    fn from(p: &ProviderSettings) -> Self {
        Self {
            base_url: p.base_url.clone(),
            username: p.username.clone(),
            has_password: p.password_enc.is_some(),
            has_token: p.token_enc.is_some(),
            connected: p.connected,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsView {
    #[serde(skip_serializing_if = "Option::is_none")]
    default_connection_type: Option<ConnectionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connection_username: Option<String>,
    has_connection_password: bool,
    github: ProviderView,
    gitea: ProviderView,
    gitlab: ProviderView,
}

impl From<&UserSettings> for SettingsView {
    fn from(s: &UserSettings) -> Self {
        Self {
            default_connection_type: s.default_connection_type,
            connection_username: s.connection_username.clone(),
            has_connection_password: s.connection_password_enc.is_some(),
            github: (&s.github).into(),
            gitea: (&s.gitea).into(),
            gitlab: (&s.gitlab).into(),
        }
    }
}

fn settings_response(settings: &UserSettings) -> Response {
    Json(json!({ "settings": SettingsView::from(settings) })).into_response()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn get_settings_handler(user: CurrentUser, State(state): State<AppState>) -> Response {
    match state.store.user_settings(&user.id).await {
        Ok(settings) => settings_response(&settings.unwrap_or_default()),
        Err(e) => store_error(e),
    }
}

/// Fields a client may change. Omitted fields keep their stored values;
/// secrets are sealed before they reach the store.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsUpdate {
    default_connection_type: Option<ConnectionType>,
    connection_username: Option<String>,
    connection_password: Option<String>,
    github_token: Option<String>,
}

async fn update_settings_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<SettingsUpdate>,
) -> Response {
    let mut settings = match state.store.user_settings(&user.id).await {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => return store_error(e),
    };

    if let Some(kind) = body.default_connection_type {
        settings.default_connection_type = Some(kind);
    }
    if let Some(username) = body.connection_username {
        settings.connection_username = Some(username);
    }
    if let Some(password) = body.connection_password.filter(|p| !p.is_empty()) {
        match state.vault.encrypt_string(&password) {
            Ok(sealed) => settings.connection_password_enc = Some(sealed),
            Err(e) => return vault_error(e),
        }
    }
    if let Some(token) = body.github_token.filter(|t| !t.is_empty()) {
        match state.vault.encrypt_string(&token) {
            Ok(sealed) => settings.github.token_enc = Some(sealed),
            Err(e) => return vault_error(e),
        }
    }

    if let Err(e) = state
        .store
        .set_user_settings(&user.id, settings.clone())
        .await
    {
        return store_error(e);
    }
    settings_response(&settings)
}
