//! Credential verification against provider "current user" endpoints.

use tracing::debug;

use crate::{
    auth::{api_root, verify_auth},
    client::USER_AGENT,
    provider::GitProvider,
    types::{GitCredentials, VerifyOutcome},
};

/// Verify credentials with a single authenticated GET to the provider's
/// "current user" endpoint.
///
/// Fails closed without a network call when required fields are missing
/// (`{ok: false, status: 400}`); transport failures map to
/// `{ok: false, status: 500}`. Otherwise `ok` reflects the upstream HTTP
/// success flag and `status` echoes its code. Never returns an error.
pub async fn verify_connection(client: &reqwest::Client, creds: &GitCredentials) -> VerifyOutcome {
    let Some(root) = api_root(creds) else {
        return VerifyOutcome::missing_credentials();
    };
    let Some((header, value)) = verify_auth(creds) else {
        return VerifyOutcome::missing_credentials();
    };

    let url = match creds.provider {
        GitProvider::Github => format!("{root}/user"),
        GitProvider::Gitea => format!("{root}/api/v1/user"),
        GitProvider::Gitlab => format!("{root}/api/v4/user"),
    };

    match client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .header(header, value)
        .send()
        .await
    {
        Ok(resp) => {
            let outcome = VerifyOutcome::from_status(resp.status());
            debug!(provider = %creds.provider, status = outcome.status, ok = outcome.ok, "verified git connection");
            outcome
        },
        Err(e) => {
            debug!(provider = %creds.provider, error = %e, "git verification request failed");
            VerifyOutcome::transport_failure()
        },
    }
}
