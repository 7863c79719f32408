//! Error types shared by every crate in the workspace.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("object '{id}' is not in the catalog")]
    MissingObject { id: String },

    #[error("trial {trial_id} is malformed: {reason}")]
    InvalidTrial { trial_id: String, reason: String },

    #[error("trial {trial_id}: standing and facing objects share a position")]
    DegenerateTrial { trial_id: String },

    #[error("result sink unavailable: {0}")]
    SinkUnavailable(String),

    #[error("assets did not load within {timeout_ms}ms")]
    AssetLoadTimeout { timeout_ms: u64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl Error {
    pub fn missing(id: impl Into<String>) -> Self {
        Error::MissingObject { id: id.into() }
    }
}
