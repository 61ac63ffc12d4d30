use serde::{Deserialize, Serialize};

/// Supported Git hosting providers.
///
/// A closed set: both network operations (verify, README fetch) are
/// implemented for exactly these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitProvider {
    Github,
    Gitlab,
    Gitea,
}

/// Error for unrecognized provider names.
#[derive(Debug, thiserror::Error)]
#[error("unknown git provider: {0}")]
pub struct UnknownProvider(pub String);

impl GitProvider {
    /// All providers, in settings display order.
    pub const ALL: [GitProvider; 3] = [Self::Github, Self::Gitea, Self::Gitlab];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Gitea => "gitea",
        }
    }
}

impl std::fmt::Display for GitProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GitProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Self::Github),
            "gitlab" => Ok(Self::Gitlab),
            "gitea" => Ok(Self::Gitea),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}
