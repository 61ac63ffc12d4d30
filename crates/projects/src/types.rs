use {atelier_git::GitProvider, serde::Deserialize, serde::Serialize};

/// Media classification used for storage subfolders and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Model,
}

impl MediaKind {
    /// Storage subfolder conventionally holding this kind of media.
    #[must_use]
    pub fn subfolder(self) -> &'static str {
        match self {
            Self::Image => "photos",
            Self::Video => "videos",
            Self::Model => "models",
        }
    }
}

/// A single media file tracked under a project's storage location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Full filesystem path of the file (storage root + subfolder + name).
    pub uri: String,
    /// Display description; falls back to the file name when no entry
    /// exists in `desc.txt`.
    pub description: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// How a project's storage location is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Nas,
    Git,
}

/// A tracked project owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    /// Directory holding `desc.txt` and the media subfolders. Empty when
    /// the project has no storage yet.
    #[serde(default)]
    pub storage_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<ConnectionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_provider: Option<GitProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}
