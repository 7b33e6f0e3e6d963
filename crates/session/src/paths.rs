use crate::error::{Result, SessionError};
use bonfire_protocol::SavedPath;
use log::info;
use std::collections::HashMap;
use uuid::Uuid;

/// Saved selection paths keyed by a generated id. Entries never change or
/// expire once saved.
#[derive(Debug, Default)]
pub struct PathStore {
    paths: HashMap<String, SavedPath>,
}

impl PathStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn save(&mut self, session_id: &str, path: Vec<String>) -> Result<String> {
        if session_id.trim().is_empty() {
            return Err(SessionError::InvalidRequest(
                "session id must not be empty".to_string(),
            ));
        }
        let path_id = Uuid::new_v4().to_string();
        info!(
            "Saved path {path_id} for session {session_id} ({} nodes)",
            path.len()
        );
        self.paths.insert(
            path_id.clone(),
            SavedPath {
                path_id: path_id.clone(),
                session_id: session_id.to_string(),
                path,
            },
        );
        Ok(path_id)
    }

    pub fn get(&self, path_id: &str) -> Result<SavedPath> {
        self.paths
            .get(path_id)
            .cloned()
            .ok_or_else(|| SessionError::PathNotFound(path_id.to_string()))
    }

    /// Newline-joined node ids of a saved path
    pub fn export(&self, path_id: &str) -> Result<String> {
        self.get(path_id).map(|saved| saved.export())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_save_then_get_and_export() {
        let mut store = PathStore::new();
        let id = store.save("s1", ids(&["n1", "n2", "n3"])).unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        let saved = store.get(&id).unwrap();
        assert_eq!(saved.session_id, "s1");
        assert_eq!(saved.path_id, id);
        assert_eq!(store.export(&id).unwrap(), "n1\nn2\nn3");
    }

    #[test]
    fn test_each_save_gets_a_fresh_id() {
        let mut store = PathStore::new();
        let a = store.save("s", ids(&["n1"])).unwrap();
        let b = store.save("s", ids(&["n1"])).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unknown_and_invalid() {
        let mut store = PathStore::new();
        assert_eq!(
            store.export("missing"),
            Err(SessionError::PathNotFound("missing".into()))
        );
        assert!(matches!(
            store.save("  ", Vec::new()),
            Err(SessionError::InvalidRequest(_))
        ));
    }
}
