//! Error types for the RepTrack system.

use thiserror::Error;

use crate::types::{PoseLandmark, SessionId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("classification unavailable: required landmark {landmark:?} missing")]
    ClassificationUnavailable { landmark: PoseLandmark },

    #[error("invalid landmark data: {0}")]
    InvalidLandmarkData(String),

    #[error("session not found: {0:?}")]
    SessionNotFound(SessionId),

    #[error("session limit reached: maximum {max} concurrent sessions")]
    SessionLimit { max: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
