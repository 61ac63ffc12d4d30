//! README retrieval: provider fetch plus first-line extraction.

use {base64::Engine, tracing::debug};

use crate::{
    auth::{api_root, readme_auth},
    client::USER_AGENT,
    provider::GitProvider,
    repo_url::parse_owner_repo,
    types::GitCredentials,
};

/// Gitea contents API response; `content` is base64, possibly with
/// embedded newlines.
#[derive(serde::Deserialize)]
struct GiteaContents {
    #[serde(default)]
    content: Option<String>,
}

/// Fetch the repository README and return its first line, trimmed.
///
/// The first line is taken verbatim (index 0 after splitting on CRLF/LF),
/// so a README opening with a blank line yields `Some("")`. Unparseable
/// URLs, missing credentials, non-2xx responses, decode failures, and
/// transport failures all yield `None`. Never returns an error.
pub async fn fetch_readme_first_line(
    client: &reqwest::Client,
    creds: &GitCredentials,
    repo_url: &str,
) -> Option<String> {
    let (owner, repo) = parse_owner_repo(repo_url)?;
    let root = api_root(creds)?;
    let (header, value) = readme_auth(creds)?;

    match creds.provider {
        GitProvider::Github => {
            let url = format!("{root}/repos/{owner}/{repo}/readme");
            let resp = client
                .get(&url)
                .header("User-Agent", USER_AGENT)
                .header("Accept", "application/vnd.github.v3.raw")
                .header(header, value)
                .send()
                .await
                .ok()?;
            if !resp.status().is_success() {
                return None;
            }
            let text = resp.text().await.ok()?;
            Some(first_line(&text))
        },
        GitProvider::Gitea => {
            // The contents API returns JSON with base64 content.
            let url = format!("{root}/api/v1/repos/{owner}/{repo}/contents/README.md");
            let resp = client
                .get(&url)
                .header("User-Agent", USER_AGENT)
                .header(header, value)
                .send()
                .await
                .ok()?;
            if !resp.status().is_success() {
                return None;
            }
            let body: GiteaContents = resp.json().await.ok()?;
            let encoded: String = body
                .content
                .unwrap_or_default()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .ok()?;
            let text = String::from_utf8(bytes).ok()?;
            Some(first_line(&text))
        },
        GitProvider::Gitlab => {
            let project = urlencoding::encode(&format!("{owner}/{repo}")).into_owned();
            // Try main then master; first 2xx wins.
            for ref_name in ["main", "master"] {
                let url = format!(
                    "{root}/api/v4/projects/{project}/repository/files/README.md/raw?ref={ref_name}"
                );
                match client
                    .get(&url)
                    .header("User-Agent", USER_AGENT)
                    .header(header, value.clone())
                    .send()
                    .await
                {
                    Ok(resp) if resp.status().is_success() => {
                        let text = resp.text().await.ok()?;
                        return Some(first_line(&text));
                    },
                    Ok(_) => {},
                    Err(e) => {
                        debug!(provider = %creds.provider, error = %e, "readme fetch failed");
                        return None;
                    },
                }
            }
            None
        },
    }
}

/// First line of `text` (split on CRLF/LF, index 0), trimmed.
fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or("").trim().to_string()
}
