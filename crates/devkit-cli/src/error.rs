//! Error types for find-module

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Structure map missing, unparseable, or without an intent index
    #[error(transparent)]
    Map(#[from] devkit_map::Error),

    #[error("Could not render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
