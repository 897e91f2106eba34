use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeakpassError {
    /// Rejected before any I/O happens.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("source unavailable: {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("undecodable text at {}:{line}", .path.display())]
    Encoding { path: PathBuf, line: u64 },

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config: {0}")]
    Config(#[from] serde_json::Error),
}

impl WeakpassError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        WeakpassError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, WeakpassError>;
