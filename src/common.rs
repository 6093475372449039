//! The common module holds the process-wide plumbing shared by the library and the CLI. Right now
//! that is just logging setup.

use crate::error::{MinerError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stderr,
    File,
}

static LOGGING_INITIALIZED: Mutex<bool> = Mutex::new(false);

/// The directory that holds musicdb.log when logging to a file.
pub fn log_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "musicdb")
        .ok_or_else(|| MinerError::Generic("Failed to get project directories".to_string()))?;
    let dir = if cfg!(target_os = "macos") {
        proj_dirs.cache_dir()
    } else {
        proj_dirs.state_dir().unwrap_or(proj_dirs.cache_dir())
    };
    Ok(dir.to_path_buf())
}

/// Install the global tracing subscriber. Calling this more than once is a no-op.
///
/// When logging to a file, the returned guard flushes buffered lines on drop, so the caller must
/// hold it until the program exits.
pub fn initialize_logging(output: LogOutput) -> Result<Option<WorkerGuard>> {
    let mut initialized = LOGGING_INITIALIZED
        .lock()
        .map_err(|_| MinerError::Generic("Logging lock poisoned".to_string()))?;
    if *initialized {
        return Ok(None);
    }
    *initialized = true;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match output {
        LogOutput::Stderr => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| MinerError::Generic(format!("Failed to install logger: {e}")))?;
            Ok(None)
        }
        LogOutput::File => {
            let dir = log_dir()?;
            fs::create_dir_all(&dir).map_err(|e| MinerError::io(&dir, e))?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix("musicdb")
                .filename_suffix("log")
                .build(&dir)
                .map_err(|e| MinerError::Generic(format!("Failed to open log file in {}: {e}", dir.display())))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| MinerError::Generic(format!("Failed to install logger: {e}")))?;
            Ok(Some(guard))
        }
    }
}
