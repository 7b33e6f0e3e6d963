use crate::clock::{Clock, SystemClock};
use crate::error::{Result, SessionError};
use bonfire_protocol::{SessionPatch, SessionState};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Sessions untouched for longer than this are dropped
    pub expiry: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            expiry: Duration::from_secs(30 * 60),
        }
    }
}

struct Entry {
    state: SessionState,
    last_access_ms: u64,
}

/// In-memory session records keyed by session id.
///
/// Every operation first sweeps expired sessions. Reads and writes both count
/// as access. Not synchronized; wrap it (see `SessionHub`) to share.
pub struct SessionStore {
    sessions: HashMap<String, Entry>,
    config: StoreConfig,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
            clock,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Start `id` from the default state, replacing any existing record
    pub fn create(&mut self, id: &str) -> SessionState {
        let now = self.clock.now_ms();
        self.sweep(now);

        let state = SessionState::new(now);
        if self.sessions.contains_key(id) {
            debug!("Resetting session {id}");
        } else {
            info!("Created session {id}");
        }
        self.sessions.insert(
            id.to_string(),
            Entry {
                state: state.clone(),
                last_access_ms: now,
            },
        );
        state
    }

    pub fn get(&mut self, id: &str) -> Result<SessionState> {
        let now = self.clock.now_ms();
        self.sweep(now);

        let entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))?;
        entry.last_access_ms = now;
        Ok(entry.state.clone())
    }

    /// Merge `patch` into an existing session and bump `updated_at`
    pub fn patch(&mut self, id: &str, patch: &SessionPatch) -> Result<SessionState> {
        let now = self.clock.now_ms();
        self.sweep(now);

        let entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))?;
        Ok(apply_patch(id, entry, patch, now))
    }

    /// Create the session if it is missing, then patch it
    pub fn write(&mut self, id: &str, patch: &SessionPatch) -> SessionState {
        let now = self.clock.now_ms();
        self.sweep(now);

        let entry = self.sessions.entry(id.to_string()).or_insert_with(|| {
            info!("Created session {id} on first write");
            Entry {
                state: SessionState::new(now),
                last_access_ms: now,
            }
        });
        apply_patch(id, entry, patch, now)
    }

    fn sweep(&mut self, now: u64) {
        let expiry = u64::try_from(self.config.expiry.as_millis()).unwrap_or(u64::MAX);
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.saturating_sub(entry.last_access_ms) <= expiry);
        let dropped = before - self.sessions.len();
        if dropped > 0 {
            info!("Expired {dropped} idle session(s)");
        }
    }
}

fn apply_patch(id: &str, entry: &mut Entry, patch: &SessionPatch, now: u64) -> SessionState {
    if entry.state.apply(patch) {
        debug!(
            "Session {id} selection -> {:?} (path length {})",
            entry.state.selected_node_id,
            entry.state.path.len()
        );
    }
    entry.state.updated_at = now.max(entry.state.updated_at + 1);
    entry.last_access_ms = now;
    entry.state.clone()
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use bonfire_protocol::{ViewMode, ZoomState};
    use pretty_assertions::assert_eq;

    fn make_store() -> (SessionStore, ManualClock) {
        let clock = ManualClock::new(1_000);
        let store = SessionStore::with_clock(StoreConfig::default(), Arc::new(clock.clone()));
        (store, clock)
    }

    #[test]
    fn test_create_gives_defaults() {
        let (mut store, _) = make_store();
        let state = store.create("s1");
        assert_eq!(state.selected_node_id, None);
        assert_eq!(state.view_mode, ViewMode::Cloud);
        assert_eq!(state.zoom_state, ZoomState::Overview);
        assert!(state.auto_play);
        assert!(state.path.is_empty());
        assert_eq!(state.updated_at, 1_000);
        assert_eq!(store.get("s1").unwrap(), state);
    }

    #[test]
    fn test_patch_unknown_session_is_not_found() {
        let (mut store, _) = make_store();
        let err = store.patch("nope", &SessionPatch::select("n1")).unwrap_err();
        assert_eq!(err, SessionError::SessionNotFound("nope".into()));
    }

    #[test]
    fn test_path_grows_only_on_change() {
        let (mut store, _) = make_store();
        store.create("s");
        store.patch("s", &SessionPatch::select("n1")).unwrap();
        store.patch("s", &SessionPatch::select("n2")).unwrap();
        let state = store.patch("s", &SessionPatch::select("n2")).unwrap();
        assert_eq!(state.path, vec!["n1".to_string(), "n2".to_string()]);
        assert_eq!(state.selected_node_id.as_deref(), Some("n2"));
    }

    #[test]
    fn test_updated_at_strictly_increases_under_frozen_clock() {
        let (mut store, _) = make_store();
        let created = store.create("s").updated_at;
        let a = store.patch("s", &SessionPatch::auto_play(false)).unwrap();
        let b = store.patch("s", &SessionPatch::auto_play(false)).unwrap();
        assert!(a.updated_at > created);
        assert!(b.updated_at > a.updated_at);
    }

    #[test]
    fn test_idle_session_expires_but_reads_keep_it_alive() {
        let (mut store, clock) = make_store();
        store.create("busy");
        store.create("idle");

        clock.advance(Duration::from_secs(20 * 60));
        store.get("busy").unwrap();
        clock.advance(Duration::from_secs(20 * 60));

        assert!(store.get("busy").is_ok());
        assert_eq!(
            store.get("idle"),
            Err(SessionError::SessionNotFound("idle".into()))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_write_auto_creates() {
        let (mut store, _) = make_store();
        let state = store.write("fresh", &SessionPatch::select("n1"));
        assert_eq!(state.path, vec!["n1".to_string()]);
        assert!(state.auto_play);
    }

    #[test]
    fn test_create_resets_existing() {
        let (mut store, _) = make_store();
        store.create("s");
        store.patch("s", &SessionPatch::select("n1")).unwrap();
        let state = store.create("s");
        assert!(state.path.is_empty());
    }
}
