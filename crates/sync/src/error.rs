use bonfire_session::SessionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Outcomes of client-side actions that could not be carried out.
///
/// The display strings double as status lines for a remote controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("No node selected")]
    NoSelection,

    #[error("No neighbors for {0}")]
    NoNeighbors(String),

    #[error("No previous node")]
    NoPreviousNode,

    #[error("No path to save")]
    EmptyPath,

    #[error("Save a path first")]
    NothingSaved,

    #[error("Background task stopped")]
    Closed,
}
