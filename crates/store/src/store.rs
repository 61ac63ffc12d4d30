//! Whole-file JSON store.
//!
//! One `store.json` under the data directory holds users, sessions,
//! settings and projects. Every accessor takes the store lock, reads the
//! file, applies its change and writes the file back pretty-printed.
//! Writers therefore serialize within the process and the last write
//! wins, matching the single-file design.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use {tokio::sync::Mutex, tracing::warn};

use atelier_projects::ProjectRecord;

use crate::{
    error::Result,
    types::{SessionRecord, StoreData, UserRecord, UserSettings},
};

/// File name created under the data directory.
pub const STORE_FILENAME: &str = "store.json";

/// Handle to the JSON store. Cheap to share behind an `Arc`.
pub struct JsonStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    /// Store backed by `<data_dir>/store.json`. The file is created on
    /// first write.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORE_FILENAME),
            lock: Mutex::new(()),
        }
    }

    fn read_file(&self) -> Result<StoreData> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoreData::default()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(data) => Ok(data),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e,
                    "store file unreadable, starting from an empty store");
                Ok(StoreData::default())
            },
        }
    }

    fn write_file(&self, data: &StoreData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    // ── Users ────────────────────────────────────────────────────────────

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let _guard = self.lock.lock().await;
        let needle = email.to_lowercase();
        let data = self.read_file()?;
        Ok(data
            .users
            .into_iter()
            .find(|u| u.email.to_lowercase() == needle))
    }

    pub async fn find_user(&self, id: &str) -> Result<Option<UserRecord>> {
        let _guard = self.lock.lock().await;
        let data = self.read_file()?;
        Ok(data.users.into_iter().find(|u| u.id == id))
    }

    pub async fn insert_user(&self, user: UserRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.read_file()?;
        data.users.push(user);
        self.write_file(&data)
    }

    // ── Sessions ─────────────────────────────────────────────────────────

    pub async fn insert_session(&self, session: SessionRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.read_file()?;
        data.sessions.push(session);
        self.write_file(&data)
    }

    /// Resolve a token hash to its live session. Expired sessions are
    /// pruned as a side effect and never returned.
    pub async fn validate_session(
        &self,
        token_hash: &str,
        now_ms: u64,
    ) -> Result<Option<SessionRecord>> {
        let _guard = self.lock.lock().await;
        let mut data = self.read_file()?;
        let before = data.sessions.len();
        data.sessions.retain(|s| s.expires_at > now_ms);
        let found = data
            .sessions
            .iter()
            .find(|s| s.token_hash == token_hash)
            .cloned();
        if data.sessions.len() != before {
            self.write_file(&data)?;
        }
        Ok(found)
    }

    pub async fn delete_session(&self, token_hash: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.read_file()?;
        data.sessions.retain(|s| s.token_hash != token_hash);
        self.write_file(&data)
    }

    // ── Settings ─────────────────────────────────────────────────────────

    pub async fn user_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        let _guard = self.lock.lock().await;
        let data = self.read_file()?;
        Ok(data.settings.get(user_id).cloned())
    }

    pub async fn set_user_settings(&self, user_id: &str, settings: UserSettings) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.read_file()?;
        data.settings.insert(user_id.to_string(), settings);
        self.write_file(&data)
    }

    // ── Projects ─────────────────────────────────────────────────────────

    pub async fn projects_by_user(&self, user_id: &str) -> Result<Vec<ProjectRecord>> {
        let _guard = self.lock.lock().await;
        let data = self.read_file()?;
        Ok(data
            .projects
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect())
    }

    pub async fn project(&self, user_id: &str, id: &str) -> Result<Option<ProjectRecord>> {
        let _guard = self.lock.lock().await;
        let data = self.read_file()?;
        Ok(data
            .projects
            .into_iter()
            .find(|p| p.user_id == user_id && p.id == id))
    }

    /// Insert or replace a project, keyed by `(user_id, id)`.
    pub async fn upsert_project(&self, project: ProjectRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.read_file()?;
        if let Some(existing) = data
            .projects
            .iter_mut()
            .find(|p| p.id == project.id && p.user_id == project.user_id)
        {
            *existing = project;
        } else {
            data.projects.push(project);
        }
        self.write_file(&data)
    }

    /// Delete the given project ids belonging to `user_id`. Returns how
    /// many records were removed.
    pub async fn delete_projects(&self, user_id: &str, ids: &[String]) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let mut data = self.read_file()?;
        let before = data.projects.len();
        data.projects
            .retain(|p| p.user_id != user_id || !ids.contains(&p.id));
        let removed = before - data.projects.len();
        self.write_file(&data)?;
        Ok(removed)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str) -> UserRecord {
        UserRecord {
            id: id.into(),
            email: email.into(),
            password_hash: "$argon2id$stub".into(),
            created_at: 1,
        }
    }

    fn project(user_id: &str, id: &str, name: &str) -> ProjectRecord {
        ProjectRecord {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            description: String::new(),
            thumbnail: None,
            media: Vec::new(),
            storage_location: String::new(),
            connection_type: None,
            connection_path: None,
            connection_provider: None,
            organization: None,
        }
    }

    #[tokio::test]
    async fn user_lookup_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store.insert_user(user("u1", "Jo@Example.com")).await.unwrap();
        let found = store.find_user_by_email("jo@example.COM").await.unwrap();
        assert_eq!(found.unwrap().id, "u1");
        assert!(store.find_user_by_email("nobody@example.com").await.unwrap().is_none());
        assert_eq!(store.find_user("u1").await.unwrap().unwrap().email, "Jo@Example.com");
    }

    #[tokio::test]
    async fn sessions_expire_and_get_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store
            .insert_session(SessionRecord {
                token_hash: "live".into(),
                user_id: "u1".into(),
                expires_at: 2_000,
            })
            .await
            .unwrap();
        store
            .insert_session(SessionRecord {
                token_hash: "stale".into(),
                user_id: "u1".into(),
                expires_at: 500,
            })
            .await
            .unwrap();

        let live = store.validate_session("live", 1_000).await.unwrap();
        assert_eq!(live.unwrap().user_id, "u1");
        // The stale session was pruned by the earlier validate call.
        assert!(store.validate_session("stale", 100).await.unwrap().is_none());

        store.delete_session("live").await.unwrap();
        assert!(store.validate_session("live", 1_000).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_token_is_rejected_even_when_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store
            .insert_session(SessionRecord {
                token_hash: "t".into(),
                user_id: "u1".into(),
                expires_at: 1_000,
            })
            .await
            .unwrap();
        assert!(store.validate_session("t", 1_000).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        assert!(store.user_settings("u1").await.unwrap().is_none());
        let mut settings = UserSettings::default();
        settings.github.username = Some("jo".into());
        settings.github.connected = true;
        store.set_user_settings("u1", settings).await.unwrap();

        let loaded = store.user_settings("u1").await.unwrap().unwrap();
        assert_eq!(loaded.github.username.as_deref(), Some("jo"));
        assert!(loaded.github.connected);
        assert!(store.user_settings("u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn project_crud_is_scoped_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store.upsert_project(project("u1", "p1", "One")).await.unwrap();
        store.upsert_project(project("u1", "p2", "Two")).await.unwrap();
        store.upsert_project(project("u2", "p1", "Other users")).await.unwrap();

        assert_eq!(store.projects_by_user("u1").await.unwrap().len(), 2);
        assert_eq!(store.projects_by_user("u2").await.unwrap().len(), 1);

        // Update in place, keyed by (user, id).
        let mut renamed = project("u1", "p1", "Renamed");
        renamed.description = "fresh".into();
        store.upsert_project(renamed).await.unwrap();
        assert_eq!(store.projects_by_user("u1").await.unwrap().len(), 2);
        let got = store.project("u1", "p1").await.unwrap().unwrap();
        assert_eq!(got.name, "Renamed");
        // The other user's record with the same id is untouched.
        assert_eq!(store.project("u2", "p1").await.unwrap().unwrap().name, "Other users");

        // Delete only the caller's ids; unknown ids are ignored.
        let removed = store
            .delete_projects("u1", &["p1".into(), "p2".into(), "ghost".into()])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(store.projects_by_user("u1").await.unwrap().is_empty());
        assert_eq!(store.projects_by_user("u2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonStore::new(dir.path());
            store.insert_user(user("u1", "jo@example.com")).await.unwrap();
        }

        let reopened = JsonStore::new(dir.path());
        let found = reopened.find_user("u1").await.unwrap();
        assert!(found.is_some());
        assert!(dir.path().join(STORE_FILENAME).exists());
    }

    #[tokio::test]
    async fn corrupt_store_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STORE_FILENAME), "not json {").unwrap();

        let store = JsonStore::new(dir.path());
        assert!(store.find_user("u1").await.unwrap().is_none());
        // The next write replaces the corrupt file.
        store.insert_user(user("u1", "jo@example.com")).await.unwrap();
        assert!(store.find_user("u1").await.unwrap().is_some());
    }
}
