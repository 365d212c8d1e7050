//! Error types for devkit-map

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not read structure map at {path}: {source}")]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse structure map at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("No intentIndex found in {path}. Regenerate the structure map and try again.")]
    NoIndex { path: PathBuf },
}

impl Error {
    pub fn load(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            source,
        }
    }

    /// True for failures to read or parse the map document itself.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::ConfigLoad { .. } | Self::ConfigParse { .. })
    }
}
