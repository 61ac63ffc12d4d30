//! Git hosting provider integration: credential verification and README
//! retrieval for GitHub, GitLab, and Gitea.
//!
//! Both network operations report expected failures in-band (missing
//! credentials, unreachable hosts, absent READMEs) instead of returning
//! errors, so callers can present a uniform "could not verify" / "could not
//! fetch" message. Secrets are held in [`secrecy::Secret`] and redacted
//! from all debug output.

mod auth;

pub mod client;
pub mod provider;
pub mod readme;
pub mod repo_url;
pub mod types;
pub mod verify;

pub use {
    client::http_client,
    provider::{GitProvider, UnknownProvider},
    readme::fetch_readme_first_line,
    repo_url::parse_owner_repo,
    types::{GitCredentials, VerifyOutcome},
    verify::verify_connection,
};
