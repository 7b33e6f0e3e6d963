use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Saved path not found: {0}")]
    PathNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SessionError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_) | Self::PathNotFound(_))
    }
}
