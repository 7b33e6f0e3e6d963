use bonfire_protocol::{SessionPatch, SessionState, ViewSettingsPatch};

/// A client's local copy of the shared session.
///
/// ```text
/// +-------------+  apply(remote) with new updated_at  +-------------+
/// |   Unsynced  | ----------------------------------> |   Synced    |
/// | last_seen=∅ |                                     | last_seen=t |
/// +-------------+                                     +------+------+
///                                                            | same t: ignored
///                                                            | new t: replace
/// ```
///
/// Local edits made through [`SessionMirror::apply_local`] show up
/// immediately and are overwritten by the next remote change.
#[derive(Debug, Clone)]
pub struct SessionMirror {
    state: SessionState,
    last_seen: Option<u64>,
    version: u64,
}

impl SessionMirror {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SessionState::new(0),
            last_seen: None,
            version: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn last_seen(&self) -> Option<u64> {
        self.last_seen
    }

    /// Bumped on every accepted remote change
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Take over `remote` if its `updated_at` differs from the last one seen.
    ///
    /// Scalars, highlights and path are replaced; view settings are merged
    /// per view and per key. Returns whether anything was taken over.
    pub fn apply(&mut self, remote: &SessionState) -> bool {
        if self.last_seen == Some(remote.updated_at) {
            return false;
        }
        self.last_seen = Some(remote.updated_at);
        self.version += 1;

        let state = &mut self.state;
        state.selected_node_id.clone_from(&remote.selected_node_id);
        state
            .highlighted_node_ids
            .clone_from(&remote.highlighted_node_ids);
        state.view_mode = remote.view_mode;
        state.zoom_state = remote.zoom_state;
        state.auto_play = remote.auto_play;
        state.path.clone_from(&remote.path);
        state
            .view_settings
            .apply(&ViewSettingsPatch::from(&remote.view_settings));
        state.updated_at = remote.updated_at;
        true
    }

    /// Optimistic local edit; returns whether the selection changed
    pub fn apply_local(&mut self, patch: &SessionPatch) -> bool {
        self.state.apply(patch)
    }
}

impl Default for SessionMirror {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonfire_protocol::{ViewMode, ZoomState};
    use pretty_assertions::assert_eq;

    fn remote(updated_at: u64) -> SessionState {
        let mut state = SessionState::new(updated_at);
        state.selected_node_id = Some("activity:101".into());
        state.highlighted_node_ids = vec!["actor:1".into()];
        state.zoom_state = ZoomState::Detail;
        state.view_mode = ViewMode::Tree;
        state.path = vec!["activity:101".into()];
        state
    }

    #[test]
    fn test_new_updated_at_replaces_state() {
        let mut mirror = SessionMirror::new();
        assert!(mirror.apply(&remote(10)));
        assert_eq!(mirror.state(), &remote(10));
        assert_eq!(mirror.last_seen(), Some(10));
        assert_eq!(mirror.version(), 1);
    }

    #[test]
    fn test_same_updated_at_is_ignored() {
        let mut mirror = SessionMirror::new();
        mirror.apply(&remote(10));
        mirror.apply_local(&SessionPatch::zoom(ZoomState::Overview));

        let mut same = remote(10);
        same.zoom_state = ZoomState::Cluster;
        assert!(!mirror.apply(&same));
        assert_eq!(mirror.state().zoom_state, ZoomState::Overview);
        assert_eq!(mirror.version(), 1);
    }

    #[test]
    fn test_remote_change_overrides_local_edit() {
        let mut mirror = SessionMirror::new();
        mirror.apply(&remote(10));
        assert!(mirror.apply_local(&SessionPatch::clear_selection()));
        assert_eq!(mirror.state().selected_node_id, None);

        let mut next = remote(11);
        next.selected_node_id = None;
        next.highlighted_node_ids.clear();
        assert!(mirror.apply(&next));
        assert_eq!(mirror.state().selected_node_id, None);
        assert!(mirror.state().highlighted_node_ids.is_empty());
    }

    #[test]
    fn test_older_timestamp_still_applies() {
        // updated_at is compared for inequality only
        let mut mirror = SessionMirror::new();
        mirror.apply(&remote(20));
        assert!(mirror.apply(&remote(5)));
        assert_eq!(mirror.last_seen(), Some(5));
    }
}
