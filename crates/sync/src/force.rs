use bonfire_layout::{ForceSimulation, LayoutItem};
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};

/// Interactive force layout on its own task.
///
/// Ticks once per frame while the simulation is warm and publishes the
/// positions after every tick. Dragging pins the node and reheats;
/// releasing unpins it. A cooled simulation idles until the next drag.
#[derive(Clone)]
pub struct ForceDriver {
    inner: Arc<ForceInner>,
}

struct ForceInner {
    command_tx: mpsc::Sender<ForceCommand>,
    items_tx: watch::Sender<Vec<LayoutItem>>,
}

enum ForceCommand {
    Drag { node_id: String, x: f64, y: f64 },
    Release { node_id: String },
    Shutdown,
}

impl ForceDriver {
    #[must_use]
    pub fn start(simulation: ForceSimulation, frame_interval: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (items_tx, _) = watch::channel(simulation.items());
        spawn_force_loop(simulation, frame_interval, command_rx, items_tx.clone());
        Self {
            inner: Arc::new(ForceInner {
                command_tx,
                items_tx,
            }),
        }
    }

    pub async fn drag(&self, node_id: impl Into<String>, x: f64, y: f64) -> crate::Result<()> {
        self.send(ForceCommand::Drag {
            node_id: node_id.into(),
            x,
            y,
        })
        .await
    }

    pub async fn release(&self, node_id: impl Into<String>) -> crate::Result<()> {
        self.send(ForceCommand::Release {
            node_id: node_id.into(),
        })
        .await
    }

    pub async fn shutdown(&self) {
        let _ = self.inner.command_tx.send(ForceCommand::Shutdown).await;
    }

    async fn send(&self, cmd: ForceCommand) -> crate::Result<()> {
        self.inner
            .command_tx
            .send(cmd)
            .await
            .map_err(|_| crate::SyncError::Closed)
    }

    #[must_use]
    pub fn items(&self) -> Vec<LayoutItem> {
        self.inner.items_tx.borrow().clone()
    }

    #[must_use]
    pub fn items_stream(&self) -> watch::Receiver<Vec<LayoutItem>> {
        self.inner.items_tx.subscribe()
    }
}

impl Drop for ForceDriver {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            let _ = self.inner.command_tx.try_send(ForceCommand::Shutdown);
        }
    }
}

fn spawn_force_loop(
    mut sim: ForceSimulation,
    frame_interval: Duration,
    mut command_rx: mpsc::Receiver<ForceCommand>,
    items_tx: watch::Sender<Vec<LayoutItem>>,
) {
    tokio::spawn(async move {
        let mut frames = time::interval(frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let warm = !sim.is_settled();
            tokio::select! {
                _ = frames.tick(), if warm => {
                    sim.tick();
                    items_tx.send_replace(sim.items());
                    if sim.is_settled() {
                        debug!("Force layout cooled at alpha {:.4}", sim.alpha());
                    }
                }
                cmd = command_rx.recv() => match cmd {
                    Some(ForceCommand::Drag { node_id, x, y }) => {
                        if sim.drag_to(&node_id, x, y) {
                            items_tx.send_replace(sim.items());
                        }
                    }
                    Some(ForceCommand::Release { node_id }) => {
                        sim.release(&node_id);
                    }
                    Some(ForceCommand::Shutdown) | None => break,
                },
            }
        }
    });
}
