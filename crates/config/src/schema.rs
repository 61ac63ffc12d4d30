/// Config schema types (server, storage, auth, git client).
use std::path::PathBuf;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Fallback app secret used when `[auth] secret` is not configured.
///
/// Fine for local development; deployments should set their own via
/// `secret = "${ATELIER_SECRET}"`.
pub const DEV_SECRET: &str = "dev-secret-change-me";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtelierConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub git: GitConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    /// Port to listen on. Defaults to 8787.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8787,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `store.json`. Defaults to the platform data dir
    /// (`~/.local/share/atelier/` on Linux).
    pub data_dir: Option<PathBuf>,
}

/// Authentication and secret-sealing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Application secret from which the at-rest sealing key is derived.
    /// Supports `${ENV_VAR}` substitution, e.g. `secret = "${ATELIER_SECRET}"`.
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub secret: Option<Secret<String>>,
    /// Session lifetime in days. Defaults to 7.
    pub session_ttl_days: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            session_ttl_days: 7,
        }
    }
}

impl AuthConfig {
    /// The configured app secret, falling back to [`DEV_SECRET`].
    ///
    /// Callers should warn when the fallback is in use; see
    /// [`AuthConfig::has_secret`].
    pub fn secret_or_dev_default(&self) -> Secret<String> {
        self.secret
            .clone()
            .unwrap_or_else(|| Secret::new(DEV_SECRET.into()))
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }
}

/// Git provider HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Request timeout in seconds for provider API calls. Defaults to 15.
    pub request_timeout_secs: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 15,
        }
    }
}

// ── Serde helpers for Secret<String> ─────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
