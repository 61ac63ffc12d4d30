//! Shared gateway state.

use std::{sync::Arc, time::Duration};

use {
    atelier_config::AtelierConfig, atelier_git::http_client, atelier_store::JsonStore,
    atelier_vault::Vault,
};

/// Everything the route handlers share. Cheap to clone; axum clones it
/// per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub vault: Arc<Vault>,
    /// Outbound client for provider API calls, with the configured timeout.
    pub http: reqwest::Client,
    pub session_ttl_ms: u64,
}

impl AppState {
    /// Build state from configuration: store under the data dir, vault
    /// keyed from the app secret, HTTP client with the git timeout.
    pub fn from_config(config: &AtelierConfig) -> reqwest::Result<Self> {
        let data_dir = config
            .storage
            .data_dir
            .clone()
            .unwrap_or_else(atelier_config::default_data_dir);
        let http = http_client(Duration::from_secs(config.git.request_timeout_secs))?;
        Ok(Self {
            store: Arc::new(JsonStore::new(&data_dir)),
            vault: Arc::new(Vault::new(&config.auth.secret_or_dev_default())),
            http,
            session_ttl_ms: config.auth.session_ttl_days * 24 * 60 * 60 * 1000,
        })
    }
}
