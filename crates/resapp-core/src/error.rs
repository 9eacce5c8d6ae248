use crate::ResultCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A lifecycle stage reported FAIL. Raised on the host side of the
    /// boundary (by the session driver); connectors themselves report
    /// failures by value.
    #[error("{code}: {message}")]
    Stage { code: ResultCode, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}
