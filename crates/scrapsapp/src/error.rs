use crate::model::{BackendKind, ScrapId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapsError {
    #[error("Scrap with id {0} not found")]
    NotFound(ScrapId),

    #[error("Storage type {0} is not available")]
    BackendUnavailable(BackendKind),

    #[error("Invalid scrap {id}: {reason}")]
    InvalidRecord { id: ScrapId, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(String),
}

impl ScrapsError {
    /// True for errors that mean "the record is not there", as opposed to a medium failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScrapsError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ScrapsError>;
