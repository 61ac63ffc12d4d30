use std::collections::HashMap;

use {
    atelier_git::GitProvider,
    atelier_projects::{ConnectionType, ProjectRecord},
    serde::{Deserialize, Serialize},
};

/// A registered user. The password is an argon2id PHC string, never the
/// plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: u64,
}

/// A login session. Only the SHA-256 of the bearer token is stored, so a
/// leaked store file cannot be replayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub token_hash: String,
    pub user_id: String,
    /// Unix millis after which the session is rejected and pruned.
    pub expires_at: u64,
}

/// Stored linkage state and sealed credentials for one git provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Vault-sealed password blob; never returned to clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_enc: Option<String>,
    /// Vault-sealed token blob; never returned to clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_enc: Option<String>,
    pub connected: bool,
}

impl ProviderSettings {
    /// Whether enough credentials are stored to attempt verification.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.token_enc.is_some() || (self.username.is_some() && self.password_enc.is_some())
    }
}

/// Per-user preferences and provider connections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_connection_type: Option<ConnectionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_username: Option<String>,
    /// Vault-sealed NAS password blob.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_password_enc: Option<String>,
    pub github: ProviderSettings,
    pub gitea: ProviderSettings,
    pub gitlab: ProviderSettings,
}

impl UserSettings {
    /// Settings slot for the given provider.
    #[must_use]
    pub fn provider(&self, provider: GitProvider) -> &ProviderSettings {
        match provider {
            GitProvider::Github => &self.github,
            GitProvider::Gitlab => &self.gitlab,
            GitProvider::Gitea => &self.gitea,
        }
    }

    pub fn provider_mut(&mut self, provider: GitProvider) -> &mut ProviderSettings {
        match provider {
            GitProvider::Github => &mut self.github,
            GitProvider::Gitlab => &mut self.gitlab,
            GitProvider::Gitea => &mut self.gitea,
        }
    }
}

/// Everything `store.json` holds.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StoreData {
    pub users: Vec<UserRecord>,
    pub sessions: Vec<SessionRecord>,
    pub settings: HashMap<String, UserSettings>,
    pub projects: Vec<ProjectRecord>,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_slots_are_distinct() {
        let mut settings = UserSettings::default();
        settings.provider_mut(GitProvider::Gitea).connected = true;
        assert!(settings.gitea.connected);
        assert!(!settings.github.connected);
        assert!(!settings.gitlab.connected);
    }

    #[test]
    fn has_credentials_requires_token_or_basic_pair() {
        let mut p = ProviderSettings::default();
        assert!(!p.has_credentials());
        p.username = Some("jo".into());
        assert!(!p.has_credentials());
        p.password_enc = Some("sealed".into());
        assert!(p.has_credentials());
        let token_only = ProviderSettings {
            token_enc: Some("sealed".into()),
            ..ProviderSettings::default()
        };
        assert!(token_only.has_credentials());
    }

    #[test]
    fn settings_serialize_camel_case() {
        let settings = UserSettings {
            default_connection_type: Some(ConnectionType::Git),
            gitea: ProviderSettings {
                base_url: Some("https://git.example.com".into()),
                token_enc: Some("sealed".into()),
                connected: true,
                ..ProviderSettings::default()
            },
            ..UserSettings::default()
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["defaultConnectionType"], "git");
        assert_eq!(json["gitea"]["baseUrl"], "https://git.example.com");
        assert_eq!(json["gitea"]["tokenEnc"], "sealed");
        assert_eq!(json["github"]["connected"], false);
    }
}
