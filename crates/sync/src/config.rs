use std::time::Duration;

/// Which side of a session a client plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRole {
    /// Primary display, polls often and runs the auto-play cycle
    Viewer,
    /// Phone-style controller, polls only to refresh its buttons
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub viewer_poll: Duration,
    pub remote_poll: Duration,
    /// How long a manual selection holds off the auto-play cycle
    pub manual_pause: Duration,
    /// Frame pacing for rotation and force loops
    pub frame_interval: Duration,
}

impl SyncConfig {
    #[must_use]
    pub const fn poll_interval(&self, role: ClientRole) -> Duration {
        match role {
            ClientRole::Viewer => self.viewer_poll,
            ClientRole::Remote => self.remote_poll,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            viewer_poll: Duration::from_millis(500),
            remote_poll: Duration::from_millis(2000),
            manual_pause: Duration::from_secs(10),
            frame_interval: Duration::from_millis(16),
        }
    }
}
