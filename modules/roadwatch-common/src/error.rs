use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoadWatchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already voted: {0}")]
    AlreadyVoted(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
