//! Viewer-side selection cycle.
//!
//! While `auto_play` is on and the view supports it, the viewer walks the
//! weighted node order one step per `cycle_interval` and publishes each step
//! as a selection with neighbor highlights. A click holds the cycle off for
//! the manual pause and moves the cycle position to the clicked node.

use crate::interaction::Interaction;
use bonfire_graph::{GraphData, WeightedNode};
use bonfire_protocol::{SessionPatch, SessionState};
use bonfire_session::SessionBackend;
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Cycle position and manual-pause bookkeeping
#[derive(Debug, Clone)]
pub struct AutoPlay {
    order: Vec<String>,
    cursor: usize,
    paused_until: Option<Instant>,
    manual_pause: Duration,
}

impl AutoPlay {
    #[must_use]
    pub fn new(order: Vec<String>, manual_pause: Duration) -> Self {
        Self {
            order,
            cursor: 0,
            paused_until: None,
            manual_pause,
        }
    }

    #[must_use]
    pub fn from_weights(nodes: &[WeightedNode], manual_pause: Duration) -> Self {
        Self::new(
            nodes.iter().map(|n| n.id().to_string()).collect(),
            manual_pause,
        )
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_paused(&self, now: Instant) -> bool {
        self.paused_until.is_some_and(|until| now < until)
    }

    /// Step to the next node unless paused or empty
    pub fn advance(&mut self, now: Instant) -> Option<&str> {
        if self.order.is_empty() || self.is_paused(now) {
            return None;
        }
        self.paused_until = None;
        self.cursor = (self.cursor + 1) % self.order.len();
        self.order.get(self.cursor).map(String::as_str)
    }

    /// Hold the cycle off and continue from `node_id` afterwards
    pub fn manual_select(&mut self, node_id: &str, now: Instant) {
        self.paused_until = Some(now + self.manual_pause);
        if let Some(idx) = self.order.iter().position(|id| id == node_id) {
            self.cursor = idx;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoPlayStatus {
    pub steps: u64,
    pub current: Option<String>,
    pub paused: bool,
    pub failed_writes: u32,
}

/// Background task driving [`AutoPlay`] against a session.
///
/// Reads `auto_play`, view mode and cycle interval from the mirrored state
/// it is given; its own writes count as the freshest state until a newer one
/// arrives.
#[derive(Clone)]
pub struct AutoPlayDriver {
    inner: Arc<DriverInner>,
}

struct DriverInner {
    command_tx: mpsc::Sender<DriverCommand>,
    status_tx: watch::Sender<AutoPlayStatus>,
}

enum DriverCommand {
    Click(String),
    Shutdown,
}

/// What the driver needs to run a cycle for one session
pub struct AutoPlaySetup {
    pub backend: Arc<dyn SessionBackend>,
    pub session_id: String,
    pub graph: GraphData,
    pub order: Vec<WeightedNode>,
    pub manual_pause: Duration,
}

impl AutoPlayDriver {
    #[must_use]
    pub fn start(setup: AutoPlaySetup, state_rx: watch::Receiver<Option<SessionState>>) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (status_tx, _) = watch::channel(AutoPlayStatus::default());
        spawn_cycle_loop(setup, state_rx, command_rx, status_tx.clone());
        Self {
            inner: Arc::new(DriverInner {
                command_tx,
                status_tx,
            }),
        }
    }

    /// Manual click on a node in the viewer
    pub async fn click(&self, node_id: impl Into<String>) -> crate::Result<()> {
        self.inner
            .command_tx
            .send(DriverCommand::Click(node_id.into()))
            .await
            .map_err(|_| crate::SyncError::Closed)
    }

    pub async fn shutdown(&self) {
        let _ = self.inner.command_tx.send(DriverCommand::Shutdown).await;
    }

    #[must_use]
    pub fn status(&self) -> AutoPlayStatus {
        self.inner.status_tx.borrow().clone()
    }

    #[must_use]
    pub fn status_stream(&self) -> watch::Receiver<AutoPlayStatus> {
        self.inner.status_tx.subscribe()
    }
}

impl Drop for AutoPlayDriver {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            let _ = self.inner.command_tx.try_send(DriverCommand::Shutdown);
        }
    }
}

/// Newest of the mirrored state and the driver's own last write
fn freshest(mirrored: Option<&SessionState>, written: Option<&SessionState>) -> Option<SessionState> {
    match (mirrored, written) {
        (Some(m), Some(w)) if w.updated_at > m.updated_at => Some(w.clone()),
        (Some(m), _) => Some(m.clone()),
        (None, w) => w.cloned(),
    }
}

fn ticker_for(period: Duration) -> Interval {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

fn spawn_cycle_loop(
    setup: AutoPlaySetup,
    state_rx: watch::Receiver<Option<SessionState>>,
    mut command_rx: mpsc::Receiver<DriverCommand>,
    status_tx: watch::Sender<AutoPlayStatus>,
) {
    tokio::spawn(async move {
        let AutoPlaySetup {
            backend,
            session_id,
            graph,
            order,
            manual_pause,
        } = setup;
        let interaction = Interaction::new(&graph);
        let mut cycle = AutoPlay::from_weights(&order, manual_pause);
        let mut status = AutoPlayStatus::default();
        let mut written: Option<SessionState> = None;

        let initial = freshest(state_rx.borrow().as_ref(), None).unwrap_or_else(|| SessionState::new(0));
        let mut period = Duration::from_millis(cycle_period_ms(&initial));
        let mut ticker = ticker_for(period);

        info!("Auto-play for session {session_id} over {} nodes", order.len());
        loop {
            let patch = tokio::select! {
                _ = ticker.tick() => {
                    let Some(current) = freshest(state_rx.borrow().as_ref(), written.as_ref()) else {
                        continue;
                    };
                    let wanted = Duration::from_millis(cycle_period_ms(&current));
                    if wanted != period {
                        debug!("Auto-play period {}ms -> {}ms", period.as_millis(), wanted.as_millis());
                        period = wanted;
                        ticker = ticker_for(period);
                        continue;
                    }
                    if !current.auto_play || !current.view_mode.cycles() {
                        continue;
                    }
                    match cycle.advance(Instant::now()) {
                        Some(id) => interaction.select(id),
                        None => {
                            status.paused = cycle.is_paused(Instant::now());
                            status_tx.send_replace(status.clone());
                            continue;
                        }
                    }
                }
                cmd = command_rx.recv() => match cmd {
                    Some(DriverCommand::Click(id)) => {
                        let current = freshest(state_rx.borrow().as_ref(), written.as_ref());
                        let selected = current.as_ref().and_then(|s| s.selected_node_id.clone());
                        if current.as_ref().map_or(true, |s| s.auto_play) {
                            cycle.manual_select(&id, Instant::now());
                        }
                        interaction.click(selected.as_deref(), &id)
                    }
                    Some(DriverCommand::Shutdown) | None => break,
                },
            };

            write_step(&*backend, &session_id, &patch, &mut written, &mut status).await;
            status.paused = cycle.is_paused(Instant::now());
            status_tx.send_replace(status.clone());
        }
        debug!("Auto-play for session {session_id} stopped");
    });
}

fn cycle_period_ms(state: &SessionState) -> u64 {
    state
        .view_settings
        .cycle_interval_ms(state.view_mode)
        .unwrap_or(state.view_settings.cloud.cycle_interval)
        .max(1)
}

async fn write_step(
    backend: &dyn SessionBackend,
    session_id: &str,
    patch: &SessionPatch,
    written: &mut Option<SessionState>,
    status: &mut AutoPlayStatus,
) {
    match backend.write_session(session_id, patch).await {
        Ok(state) => {
            status.steps += 1;
            status.current.clone_from(&state.selected_node_id);
            *written = Some(state);
        }
        Err(err) => {
            debug!("Auto-play write to {session_id} failed: {err}");
            status.failed_writes += 1;
        }
    }
}
