//! The config module defines the configuration file format and its parsing logic.
//!
//! Invalid configurations produce a detailed error naming the offending key and file, and
//! unrecognized keys produce a warning.

use crate::error::{MinerError, MinerExpectedError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DATABASE_FILENAME: &str = "musicdb.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root directory that gets mined for audio files.
    pub music_source_dir: PathBuf,
    /// SQLite database holding the catalog.
    pub database_path: PathBuf,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "musicdb")
}

/// Default location of the configuration file: `<user config dir>/musicdb/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    project_dirs()
        .map(|d| d.config_dir().join("config.toml"))
        .ok_or_else(|| MinerError::Generic("Failed to get project directories".to_string()))
}

/// Default location of the catalog database. Falls back to the working directory when the user has
/// no home directory.
pub fn default_database_path() -> PathBuf {
    match project_dirs() {
        Some(d) => d.data_dir().join(DATABASE_FILENAME),
        None => PathBuf::from(DATABASE_FILENAME),
    }
}

fn expand_path(s: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(s).into_owned())
}

fn take_path(data: &mut toml::Table, key: &str, cfgpath: &Path) -> Result<Option<PathBuf>> {
    match data.remove(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) if !s.trim().is_empty() => Ok(Some(expand_path(&s))),
        Some(other) => Err(MinerExpectedError::InvalidConfigValue {
            key: key.to_string(),
            path: cfgpath.to_path_buf(),
            reason: format!("must be a non-empty path: got {other}"),
        }
        .into()),
    }
}

impl Config {
    /// Build a config for mining `music_source_dir` into the default database.
    pub fn new(music_source_dir: PathBuf) -> Config {
        Config {
            music_source_dir,
            database_path: default_database_path(),
        }
    }

    /// Read and validate the configuration file. Pass `None` to read the default location.
    pub fn parse(config_path_override: Option<&Path>) -> Result<Config> {
        Self::_parse(config_path_override, None)
    }

    /// Like [`Config::parse`], but mines `root` instead of the configured `music_source_dir`. The
    /// configuration file and its `music_source_dir` key become optional.
    pub fn parse_with_root(config_path_override: Option<&Path>, root: &Path) -> Result<Config> {
        match Self::_parse(config_path_override, Some(root)) {
            Err(MinerError::Expected(MinerExpectedError::ConfigNotFound { path })) => {
                debug!("No configuration file at {}, using defaults", path.display());
                Ok(Config::new(root.to_path_buf()))
            }
            result => result,
        }
    }

    fn _parse(config_path_override: Option<&Path>, root: Option<&Path>) -> Result<Config> {
        let cfgpath = match config_path_override {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        debug!("Reading configuration from {}", cfgpath.display());

        let cfgtext = match fs::read_to_string(&cfgpath) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MinerExpectedError::ConfigNotFound { path: cfgpath }.into());
            }
            Err(e) => return Err(MinerError::io(&cfgpath, e)),
        };

        let mut data: toml::Table = toml::from_str(&cfgtext).map_err(|e| MinerExpectedError::ConfigDecode {
            path: cfgpath.clone(),
            reason: e.to_string(),
        })?;

        let music_source_dir = match (take_path(&mut data, "music_source_dir", &cfgpath)?, root) {
            (_, Some(root)) => root.to_path_buf(),
            (Some(dir), None) => dir,
            (None, None) => {
                return Err(MinerExpectedError::MissingConfigKey {
                    key: "music_source_dir".to_string(),
                    path: cfgpath,
                }
                .into())
            }
        };
        let database_path = take_path(&mut data, "database_path", &cfgpath)?.unwrap_or_else(default_database_path);

        for key in data.keys() {
            warn!("Unrecognized key {key} in configuration file ({})", cfgpath.display());
        }

        Ok(Config {
            music_source_dir,
            database_path,
        })
    }
}
