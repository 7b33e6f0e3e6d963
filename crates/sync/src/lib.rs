//! # Bonfire Sync
//!
//! Client side of a shared viewing session: a viewer that mirrors the
//! session and cycles through nodes, and remote controllers that drive it.
//!
//! ## Architecture
//!
//! ```text
//!             SessionBackend (bonfire-session)
//!              ▲            ▲             ▲
//!   get_session│ every 500ms│write_session│ button actions
//!              │            │             │
//!      SessionPoller   AutoPlayDriver   RemoteController
//!      └─ SessionMirror     │  └─ AutoPlay (cycle + manual pause)
//!           │               │  └─ Interaction (click toggle)
//!           └──watch────────┘
//!
//!   FrameLoop / AnimationSlot ── rotation_loop, ForceDriver
//! ```
//!
//! Nothing orders concurrent writers: the viewer's cycle and a remote click
//! race and the later write wins.

mod autoplay;
mod config;
mod error;
mod force;
mod frames;
mod interaction;
mod mirror;
mod poller;
mod remote;

pub use autoplay::{AutoPlay, AutoPlayDriver, AutoPlaySetup, AutoPlayStatus};
pub use config::{ClientRole, SyncConfig};
pub use error::{Result, SyncError};
pub use force::ForceDriver;
pub use frames::{rotation_loop, AnimationSlot, FrameControl, FrameLoop};
pub use interaction::Interaction;
pub use mirror::SessionMirror;
pub use poller::{PollerHealth, SessionPoller};
pub use remote::RemoteController;
