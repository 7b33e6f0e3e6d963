use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Failures while obtaining a graph from an upstream source.
///
/// A failed load never yields a partially applied graph.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid graph payload: {0}")]
    InvalidPayload(String),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),
}
