use crate::clock::Clock;
use crate::error::Result;
use crate::paths::PathStore;
use crate::store::{SessionStore, StoreConfig};
use async_trait::async_trait;
use bonfire_protocol::{SavedPath, SessionPatch, SessionState};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Operations a viewer or remote client performs against the session service.
///
/// Implemented in-process by [`SessionHub`]; a networked client would
/// implement the same trait.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn create_session(&self, session_id: &str) -> Result<SessionState>;

    async fn get_session(&self, session_id: &str) -> Result<SessionState>;

    async fn patch_session(&self, session_id: &str, patch: &SessionPatch) -> Result<SessionState>;

    /// Create the session when missing, then patch it
    async fn write_session(&self, session_id: &str, patch: &SessionPatch) -> Result<SessionState>;

    async fn save_path(&self, session_id: &str, path: Vec<String>) -> Result<String>;

    async fn get_path(&self, path_id: &str) -> Result<SavedPath>;

    async fn export_path(&self, path_id: &str) -> Result<String>;
}

/// Process-wide session and path state behind async mutexes.
///
/// Cheap to clone; all clones share the same stores.
#[derive(Clone)]
pub struct SessionHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    sessions: Mutex<SessionStore>,
    paths: Mutex<PathStore>,
}

impl SessionHub {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self::from_store(SessionStore::new(config))
    }

    #[must_use]
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self::from_store(SessionStore::with_clock(config, clock))
    }

    fn from_store(store: SessionStore) -> Self {
        Self {
            inner: Arc::new(HubInner {
                sessions: Mutex::new(store),
                paths: Mutex::new(PathStore::new()),
            }),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.inner.sessions.lock().await.len()
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

#[async_trait]
impl SessionBackend for SessionHub {
    async fn create_session(&self, session_id: &str) -> Result<SessionState> {
        Ok(self.inner.sessions.lock().await.create(session_id))
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionState> {
        self.inner.sessions.lock().await.get(session_id)
    }

    async fn patch_session(&self, session_id: &str, patch: &SessionPatch) -> Result<SessionState> {
        self.inner.sessions.lock().await.patch(session_id, patch)
    }

    async fn write_session(&self, session_id: &str, patch: &SessionPatch) -> Result<SessionState> {
        Ok(self.inner.sessions.lock().await.write(session_id, patch))
    }

    async fn save_path(&self, session_id: &str, path: Vec<String>) -> Result<String> {
        self.inner.paths.lock().await.save(session_id, path)
    }

    async fn get_path(&self, path_id: &str) -> Result<SavedPath> {
        self.inner.paths.lock().await.get(path_id)
    }

    async fn export_path(&self, path_id: &str) -> Result<String> {
        self.inner.paths.lock().await.export(path_id)
    }
}
