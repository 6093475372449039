use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinerError {
    #[error("Miner error: {0}")]
    Generic(String),
    #[error(transparent)]
    Expected(#[from] MinerExpectedError),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse tags of {path}: {reason}")]
    TagParse { path: PathBuf, reason: String },
    #[error("Failed to insert performer {name:?}: {source}")]
    PerformerInsert {
        name: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Failed to insert album {name:?}: {source}")]
    AlbumInsert {
        name: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Failed to insert rola {title:?}: {source}")]
    TrackInsert {
        title: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl MinerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MinerError::Io { path: path.into(), source }
    }
}

/// Errors caused by user input, such as a broken configuration file.
#[derive(Error, Debug)]
pub enum MinerExpectedError {
    #[error("{0}")]
    Generic(String),
    #[error("Configuration file not found ({path})")]
    ConfigNotFound { path: PathBuf },
    #[error("Failed to decode configuration file ({path}): {reason}")]
    ConfigDecode { path: PathBuf, reason: String },
    #[error("Missing key {key} in configuration file ({path})")]
    MissingConfigKey { key: String, path: PathBuf },
    #[error("Invalid value for {key} in configuration file ({path}): {reason}")]
    InvalidConfigValue { key: String, path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, MinerError>;
