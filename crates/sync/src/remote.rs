use crate::config::{ClientRole, SyncConfig};
use crate::error::{Result, SyncError};
use crate::poller::{PollerHealth, SessionPoller};
use bonfire_graph::{neighbor_at, GraphData};
use bonfire_protocol::{SessionPatch, SessionState, ZoomState};
use bonfire_session::SessionBackend;
use log::info;
use std::sync::Arc;
use tokio::sync::watch;

/// Button actions of a remote controller bound to one session.
///
/// Each action reads the current session state first and writes through
/// `write_session`, so the first action of a controller creates the session
/// when the viewer has not. Between actions the controller mirrors the
/// session on the remote poll interval to keep its buttons current.
pub struct RemoteController {
    backend: Arc<dyn SessionBackend>,
    session_id: String,
    graph: Arc<GraphData>,
    poller: SessionPoller,
    neighbor_cursor: usize,
    last_path_id: Option<String>,
}

impl RemoteController {
    /// Bind to `session_id` and start mirroring it. Needs a tokio runtime.
    #[must_use]
    pub fn new(
        backend: Arc<dyn SessionBackend>,
        session_id: impl Into<String>,
        graph: Arc<GraphData>,
        config: &SyncConfig,
    ) -> Self {
        let session_id = session_id.into();
        let poller = SessionPoller::start(
            Arc::clone(&backend),
            session_id.clone(),
            config.poll_interval(ClientRole::Remote),
        );
        Self {
            backend,
            session_id,
            graph,
            poller,
            neighbor_cursor: 0,
            last_path_id: None,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Session as of the last remote poll; `None` before the first success
    #[must_use]
    pub fn mirrored(&self) -> Option<SessionState> {
        self.poller.latest()
    }

    #[must_use]
    pub fn state_stream(&self) -> watch::Receiver<Option<SessionState>> {
        self.poller.state_stream()
    }

    #[must_use]
    pub fn poll_health(&self) -> PollerHealth {
        self.poller.health_snapshot()
    }

    /// Stop mirroring; actions keep working
    pub async fn shutdown(&self) {
        self.poller.shutdown().await;
    }

    #[must_use]
    pub fn last_path_id(&self) -> Option<&str> {
        self.last_path_id.as_deref()
    }

    async fn current(&self) -> Result<SessionState> {
        Ok(self.backend.get_session(&self.session_id).await?)
    }

    async fn write(&self, patch: &SessionPatch) -> Result<SessionState> {
        Ok(self.backend.write_session(&self.session_id, patch).await?)
    }

    /// Flip auto-play and return the new value
    pub async fn toggle_auto_play(&mut self) -> Result<bool> {
        let enabled = match self.current().await {
            Ok(state) => !state.auto_play,
            Err(SyncError::Session(err)) if err.is_not_found() => false,
            Err(err) => return Err(err),
        };
        let state = self.write(&SessionPatch::auto_play(enabled)).await?;
        info!("Auto-play {}", if state.auto_play { "ON" } else { "OFF" });
        Ok(state.auto_play)
    }

    /// Step one zoom level in; `None` when already at the closest level
    pub async fn zoom_in(&mut self) -> Result<Option<ZoomState>> {
        self.step_zoom(ZoomState::zoom_in).await
    }

    /// Step one zoom level out; `None` when already at the overview
    pub async fn zoom_out(&mut self) -> Result<Option<ZoomState>> {
        self.step_zoom(ZoomState::zoom_out).await
    }

    async fn step_zoom(&mut self, step: fn(ZoomState) -> ZoomState) -> Result<Option<ZoomState>> {
        let current = self.current().await?.zoom_state;
        let next = step(current);
        if next == current {
            return Ok(None);
        }
        self.write(&SessionPatch::zoom(next)).await?;
        Ok(Some(next))
    }

    pub async fn clear_selection(&mut self) -> Result<()> {
        self.write(&SessionPatch::clear_selection()).await?;
        self.neighbor_cursor = 0;
        Ok(())
    }

    /// Select the next neighbor of the current selection, cycling through
    /// them on repeated calls
    pub async fn next_neighbor(&mut self) -> Result<String> {
        let state = self.current().await?;
        let selected = state.selected_node_id.ok_or(SyncError::NoSelection)?;
        let step = neighbor_at(&self.graph, &selected, self.neighbor_cursor)
            .ok_or_else(|| SyncError::NoNeighbors(selected.clone()))?;

        self.write(&SessionPatch::select(step.neighbor_id.clone()))
            .await?;
        self.neighbor_cursor = step.next_cursor;
        Ok(step.neighbor_id)
    }

    /// Go back to the node selected before the current one
    pub async fn previous_node(&mut self) -> Result<String> {
        let state = self.current().await?;
        let len = state.path.len();
        if len < 2 {
            return Err(SyncError::NoPreviousNode);
        }
        let previous = state.path[len - 2].clone();
        self.write(&SessionPatch::select(previous.clone())).await?;
        Ok(previous)
    }

    /// Archive the session's path and remember its id for export
    pub async fn save_path(&mut self) -> Result<String> {
        let state = self.current().await?;
        if state.path.is_empty() {
            return Err(SyncError::EmptyPath);
        }
        let path_id = self.backend.save_path(&self.session_id, state.path).await?;
        self.last_path_id = Some(path_id.clone());
        Ok(path_id)
    }

    /// Text export of the last saved path
    pub async fn export_path(&self) -> Result<String> {
        let path_id = self.last_path_id.as_deref().ok_or(SyncError::NothingSaved)?;
        Ok(self.backend.export_path(path_id).await?)
    }
}
