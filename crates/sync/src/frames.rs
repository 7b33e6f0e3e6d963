use bonfire_layout::RotationClock;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop,
}

/// A frame-paced callback on its own task. Dropping the handle aborts it.
#[derive(Debug)]
pub struct FrameLoop {
    handle: JoinHandle<()>,
}

impl FrameLoop {
    /// Call `frame` with the time since the previous frame until it returns
    /// [`FrameControl::Stop`]
    pub fn start<F>(interval: Duration, mut frame: F) -> Self
    where
        F: FnMut(Duration) -> FrameControl + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last = Instant::now();
            loop {
                ticker.tick().await;
                let now = Instant::now();
                let elapsed = now - last;
                last = now;
                if frame(elapsed) == FrameControl::Stop {
                    break;
                }
            }
        });
        Self { handle }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Holds at most one running loop; starting another aborts the previous one.
#[derive(Debug, Default)]
pub struct AnimationSlot {
    current: Option<FrameLoop>,
}

impl AnimationSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    pub fn replace(&mut self, next: FrameLoop) {
        if let Some(previous) = self.current.replace(next) {
            previous.abort();
        }
    }

    pub fn stop(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.abort();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|l| !l.is_finished())
    }
}

/// Spin `clock` every frame and publish the ring offset
pub fn rotation_loop(
    mut clock: RotationClock,
    interval: Duration,
) -> (FrameLoop, watch::Receiver<f64>) {
    let (offset_tx, offset_rx) = watch::channel(clock.offset());
    let frames = FrameLoop::start(interval, move |elapsed| {
        offset_tx.send_replace(clock.advance(elapsed));
        FrameControl::Continue
    });
    (frames, offset_rx)
}
