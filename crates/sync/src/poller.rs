use crate::error::{Result, SyncError};
use crate::mirror::SessionMirror;
use bonfire_protocol::SessionState;
use bonfire_session::SessionBackend;
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{self, MissedTickBehavior};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PollerHealth {
    pub polls: u64,
    /// Polls that brought a new `updated_at`
    pub changes: u64,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    pub last_seen: Option<u64>,
}

/// Keeps a [`SessionMirror`] current by reading the session on a fixed cadence.
///
/// The first read happens right away. Failed reads are logged at debug level
/// and retried on the next tick. The loop stops on [`SessionPoller::shutdown`]
/// or when the last handle is dropped.
#[derive(Clone)]
pub struct SessionPoller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    session_id: String,
    command_tx: mpsc::Sender<PollCommand>,
    state_tx: watch::Sender<Option<SessionState>>,
    change_tx: broadcast::Sender<SessionState>,
    health_tx: watch::Sender<PollerHealth>,
}

enum PollCommand {
    PollNow,
    Shutdown,
}

impl SessionPoller {
    /// Spawn the polling loop on the current tokio runtime
    #[must_use]
    pub fn start(
        backend: Arc<dyn SessionBackend>,
        session_id: impl Into<String>,
        interval: Duration,
    ) -> Self {
        let session_id = session_id.into();
        let (command_tx, command_rx) = mpsc::channel(16);
        let (state_tx, _) = watch::channel(None);
        let (change_tx, _) = broadcast::channel(32);
        let (health_tx, _) = watch::channel(PollerHealth::default());

        spawn_poll_loop(
            backend,
            session_id.clone(),
            interval,
            command_rx,
            state_tx.clone(),
            change_tx.clone(),
            health_tx.clone(),
        );

        Self {
            inner: Arc::new(PollerInner {
                session_id,
                command_tx,
                state_tx,
                change_tx,
                health_tx,
            }),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// Read now instead of waiting for the next tick
    pub async fn poll_now(&self) -> Result<()> {
        self.inner
            .command_tx
            .send(PollCommand::PollNow)
            .await
            .map_err(|_| SyncError::Closed)
    }

    pub async fn shutdown(&self) {
        let _ = self.inner.command_tx.send(PollCommand::Shutdown).await;
    }

    /// Mirrored state, `None` until the first successful read
    #[must_use]
    pub fn latest(&self) -> Option<SessionState> {
        self.inner.state_tx.borrow().clone()
    }

    #[must_use]
    pub fn state_stream(&self) -> watch::Receiver<Option<SessionState>> {
        self.inner.state_tx.subscribe()
    }

    /// Every accepted change, in order
    #[must_use]
    pub fn subscribe_changes(&self) -> broadcast::Receiver<SessionState> {
        self.inner.change_tx.subscribe()
    }

    #[must_use]
    pub fn health_snapshot(&self) -> PollerHealth {
        self.inner.health_tx.borrow().clone()
    }
}

impl Drop for SessionPoller {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            let _ = self.inner.command_tx.try_send(PollCommand::Shutdown);
        }
    }
}

fn spawn_poll_loop(
    backend: Arc<dyn SessionBackend>,
    session_id: String,
    interval: Duration,
    mut command_rx: mpsc::Receiver<PollCommand>,
    state_tx: watch::Sender<Option<SessionState>>,
    change_tx: broadcast::Sender<SessionState>,
    health_tx: watch::Sender<PollerHealth>,
) {
    tokio::spawn(async move {
        let mut mirror = SessionMirror::new();
        let mut health = PollerHealth::default();
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Polling session {session_id} every {}ms", interval.as_millis());
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                cmd = command_rx.recv() => match cmd {
                    Some(PollCommand::PollNow) => {}
                    Some(PollCommand::Shutdown) | None => break,
                },
            }

            health.polls += 1;
            match backend.get_session(&session_id).await {
                Ok(remote) => {
                    health.consecutive_failures = 0;
                    health.last_error = None;
                    if mirror.apply(&remote) {
                        health.changes += 1;
                        health.last_seen = mirror.last_seen();
                        state_tx.send_replace(Some(mirror.state().clone()));
                        let _ = change_tx.send(mirror.state().clone());
                    }
                }
                Err(err) => {
                    debug!("Poll of session {session_id} failed: {err}");
                    health.consecutive_failures += 1;
                    health.last_error = Some(err.to_string());
                }
            }
            health_tx.send_replace(health.clone());
        }
        debug!("Session poller for {session_id} stopped");
    });
}
