use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

use crate::provider::GitProvider;

/// Credentials for one Git hosting provider.
///
/// At least one of `(username, password)` or `token` must be present for a
/// network call to be issued; otherwise both operations fail closed.
/// `base_url` is required for gitea, defaults to the public host for gitlab,
/// and is ignored for github. Empty strings count as absent.
#[derive(Clone, Serialize, Deserialize)]
pub struct GitCredentials {
    pub provider: GitProvider,
    /// Root of a self-hosted instance, e.g. `https://git.example.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<Secret<String>>,
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<Secret<String>>,
}

impl GitCredentials {
    /// Credentials with nothing set yet.
    #[must_use]
    pub fn new(provider: GitProvider) -> Self {
        Self {
            provider,
            base_url: None,
            username: None,
            password: None,
            token: None,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_basic(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(Secret::new(password.into()));
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Secret::new(token.into()));
        self
    }
}

impl std::fmt::Debug for GitCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitCredentials")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Result of a credential verification call.
///
/// `ok` is the HTTP success flag of the single upstream request; `status`
/// echoes the upstream status code for diagnostics. Missing credentials and
/// transport failures are reported in-band, never as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    pub ok: bool,
    pub status: u16,
}

impl VerifyOutcome {
    /// Required fields were missing; no network call was made.
    #[must_use]
    pub fn missing_credentials() -> Self {
        Self {
            ok: false,
            status: 400,
        }
    }

    /// The request could not complete (DNS, refused, timeout).
    #[must_use]
    pub fn transport_failure() -> Self {
        Self {
            ok: false,
            status: 500,
        }
    }

    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        Self {
            ok: status.is_success(),
            status: status.as_u16(),
        }
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

/// Serialize an `Option<Secret<String>>` by exposing its inner value.
/// Use only for values that must round-trip through storage.
pub fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
