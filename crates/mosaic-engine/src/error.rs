use mosaic_persist::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Nothing to send: message text and image are both empty")]
    EmptyInput,

    #[error("No active thread")]
    NoActiveThread,

    #[error("A message is already being sent on thread {0}")]
    SendInProgress(String),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
