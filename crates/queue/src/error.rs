use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("writer task is no longer running")]
    Closed,
    #[error("sink panicked during write: {0}")]
    Panicked(String),
}
