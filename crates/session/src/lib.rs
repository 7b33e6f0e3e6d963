//! # Bonfire Session
//!
//! Authoritative per-session viewing state shared by a primary viewer and its
//! remote controllers, plus the saved-path archive.
//!
//! ```text
//! SessionBackend (trait)
//!     │
//!     └──> SessionHub ── Arc<Mutex<..>>
//!            ├─ SessionStore  create / get / patch / write, idle expiry
//!            │     └─ path grows on every selection change
//!            └─ PathStore     save (uuid) / get / export
//! ```
//!
//! All state lives in memory and is lost on restart.

mod clock;
mod error;
mod hub;
mod paths;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, SessionError};
pub use hub::{SessionBackend, SessionHub};
pub use paths::PathStore;
pub use store::{SessionStore, StoreConfig};
