//! Auth header construction and API root resolution per provider.
//!
//! Both network operations share these tables so the three-way provider
//! branch lives in exactly one place.

use {
    base64::Engine,
    secrecy::{ExposeSecret, Secret},
};

use crate::{provider::GitProvider, types::GitCredentials};

/// Public GitHub API host. GitHub has no self-hosted override.
const GITHUB_API: &str = "https://api.github.com";

/// Default GitLab host when no base URL is configured.
const GITLAB_DEFAULT: &str = "https://gitlab.com";

/// Resolve the provider API root, trimming one trailing slash.
///
/// `None` means the provider requires a base URL and none was configured.
pub(crate) fn api_root(creds: &GitCredentials) -> Option<String> {
    match creds.provider {
        GitProvider::Github => Some(GITHUB_API.to_string()),
        GitProvider::Gitea => non_empty(creds.base_url.as_deref()).map(trim_slash),
        GitProvider::Gitlab => Some(trim_slash(
            non_empty(creds.base_url.as_deref()).unwrap_or(GITLAB_DEFAULT),
        )),
    }
}

/// Auth header for the verify operation.
///
/// GitHub prefers Basic over Bearer here; gitea and gitlab prefer their
/// token forms. `None` means required credentials are missing.
pub(crate) fn verify_auth(creds: &GitCredentials) -> Option<(&'static str, String)> {
    match creds.provider {
        GitProvider::Github => basic(creds)
            .map(|v| ("Authorization", v))
            .or_else(|| token(creds)),
        GitProvider::Gitea | GitProvider::Gitlab => {
            token(creds).or_else(|| basic(creds).map(|v| ("Authorization", v)))
        },
    }
}

/// Auth header for the README fetch. Token forms win for every provider.
pub(crate) fn readme_auth(creds: &GitCredentials) -> Option<(&'static str, String)> {
    token(creds).or_else(|| basic(creds).map(|v| ("Authorization", v)))
}

/// `Basic <base64(user:pass)>` when both username and password are set.
fn basic(creds: &GitCredentials) -> Option<String> {
    let user = non_empty(creds.username.as_deref())?;
    let pass = secret_non_empty(creds.password.as_ref())?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"));
    Some(format!("Basic {encoded}"))
}

/// The provider's token-auth header, when a token is set.
fn token(creds: &GitCredentials) -> Option<(&'static str, String)> {
    let t = secret_non_empty(creds.token.as_ref())?;
    Some(match creds.provider {
        GitProvider::Github => ("Authorization", format!("Bearer {t}")),
        GitProvider::Gitea => ("Authorization", format!("token {t}")),
        GitProvider::Gitlab => ("PRIVATE-TOKEN", t.to_string()),
    })
}

fn trim_slash(s: &str) -> String {
    s.strip_suffix('/').unwrap_or(s).to_string()
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

fn secret_non_empty(v: Option<&Secret<String>>) -> Option<&str> {
    v.map(|s| s.expose_secret().as_str())
        .filter(|s| !s.is_empty())
}
