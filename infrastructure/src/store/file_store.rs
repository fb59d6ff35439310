//! Session persistence
//!
//! [`FileSessionStore`] keeps one pretty-printed JSON file per session so
//! transcripts stay inspectable with ordinary tools. Writes go through a
//! temp file and rename; a crash mid-save leaves the previous snapshot
//! intact.

use async_trait::async_trait;
use greenroom_application::ports::session_store::{SessionStore, StoreError};
use greenroom_domain::{Session, SessionId};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// File-per-session store rooted at a directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform default: `{data_dir}/greenroom/sessions`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("greenroom").join("sessions"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_path(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!("{}.json", id.as_str()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", self.dir.display(), e)))?;

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let path = self.session_path(session.id());
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))?;

        debug!("Saved session {} to {}", session.id(), path.display());
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> Result<Session, StoreError> {
        let path = self.session_path(id);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.clone()));
            }
            Err(e) => return Err(StoreError::Io(format!("{}: {}", path.display(), e))),
        };
        serde_json::from_str(&json).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<SessionId>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            // A store that was never written to is just empty
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(format!("{}: {}", self.dir.display(), e))),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(SessionId::from(stem));
            }
        }
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ids)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        let path = self.session_path(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.clone())),
            Err(e) => Err(StoreError::Io(format!("{}: {}", path.display(), e))),
        }
    }
}

/// In-memory store for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> Result<Session, StoreError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn list(&self) -> Result<Vec<SessionId>, StoreError> {
        let mut ids: Vec<SessionId> = self.sessions.read().await.keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ids)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenroom_domain::{InterviewKind, MessageKind, SessionProfile, Speaker};

    fn sample_session() -> Session {
        let mut session = Session::interview(
            InterviewKind::Technical,
            SessionProfile::new().with_company("Acme").with_role("Engineer"),
        );
        session.activate().unwrap();
        session
            .record(Speaker::Interviewer, MessageKind::Greeting, "Welcome!")
            .unwrap();
        session
            .record(Speaker::Human, MessageKind::Response, "Glad to be here.")
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let session = sample_session();

        store.save(&session).await.unwrap();
        let loaded = store.load(session.id()).await.unwrap();

        assert_eq!(loaded.id(), session.id());
        assert_eq!(loaded.status(), session.status());
        assert_eq!(loaded.transcript().len(), 2);
        assert_eq!(
            loaded.transcript().messages()[0].content,
            "Welcome!"
        );
    }

    #[tokio::test]
    async fn test_load_missing_session_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());

        let err = store.load(&SessionId::generate()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let mut session = sample_session();

        store.save(&session).await.unwrap();
        session
            .record(Speaker::Interviewer, MessageKind::Question, "First question?")
            .unwrap();
        store.save(&session).await.unwrap();

        let loaded = store.load(session.id()).await.unwrap();
        assert_eq!(loaded.transcript().len(), 3);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let first = sample_session();
        let second = sample_session();

        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);

        store.delete(first.id()).await.unwrap();
        let remaining = store.list().await.unwrap();
        assert_eq!(remaining, vec![second.id().clone()]);

        let err = store.delete(first.id()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_on_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("never-created"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        let session = sample_session();

        store.save(&session).await.unwrap();
        let loaded = store.load(session.id()).await.unwrap();
        assert_eq!(loaded.transcript().len(), 2);

        store.delete(session.id()).await.unwrap();
        let err = store.load(session.id()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
