//! Error types for devkit-tools

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not read tool registry at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid tool registry at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Tool registry has no tools")]
    EmptyRegistry,

    #[error("Default tool '{0}' is not registered")]
    UnknownDefault(String),

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Invalid payload for {channel}: {message}")]
    InvalidPayload { channel: String, message: String },

    #[error("Tool authority is not running")]
    AuthorityUnavailable,

    #[error("Tool authority failed {channel}: {message}")]
    RemoteFailure { channel: String, message: String },
}
