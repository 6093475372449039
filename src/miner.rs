//! The miner module drives a whole run: locate the audio files under a directory, read and
//! normalize each file's tags, and write it into the catalog.
//!
//! Files are processed one at a time, each in its own transaction. A file that fails is recorded in
//! the [`MiningReport`] and the run moves on; files committed before it stay committed.

use crate::audiotags::{Id3TagReader, TagReader};
use crate::catalog::{Catalog, RolaId};
use crate::config::Config;
use crate::error::{MinerError, Result};
use crate::locator::locate_audio_files;
use crate::metadata::normalize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: MinerError,
}

#[derive(Debug, Default)]
pub struct MiningReport {
    /// Number of files written into the catalog.
    pub processed: usize,
    /// Files that could not be mined, in processing order.
    pub failures: Vec<FileFailure>,
}

impl MiningReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Mine a single file into the catalog.
pub fn process_file(catalog: &mut Catalog, reader: &dyn TagReader, path: &Path) -> Result<RolaId> {
    let mut file = File::open(path).map_err(|e| MinerError::io(path, e))?;
    let raw = reader.read_tags(path, &mut file)?;
    drop(file);
    let metadata = normalize(&raw);
    debug!("Normalized metadata of {}: {:?}", path.display(), metadata);
    catalog.write_rola(path, &metadata)
}

/// Mine every audio file under `root` into the catalog.
///
/// Only a failure to traverse `root` aborts the run. Per-file failures are collected in the report.
pub fn mine_directory(catalog: &mut Catalog, reader: &dyn TagReader, root: &Path) -> Result<MiningReport> {
    let start = Instant::now();
    let paths = locate_audio_files(root)?;
    info!("Mining {} audio files under {}", paths.len(), root.display());

    let mut report = MiningReport::default();
    for path in paths {
        match process_file(catalog, reader, &path) {
            Ok(rola_id) => {
                debug!("Mined {} into rola {}", path.display(), rola_id);
                report.processed += 1;
            }
            Err(error) => {
                warn!("Failed to mine {}: {}", path.display(), error);
                report.failures.push(FileFailure { path, error });
            }
        }
    }

    info!(
        "Mined {} files with {} failures in {:?}",
        report.processed,
        report.failures.len(),
        start.elapsed()
    );
    Ok(report)
}

/// Mine the configured music source directory into the configured database. The catalog is open
/// only for the duration of the run.
pub fn mine(c: &Config) -> Result<MiningReport> {
    let mut catalog = Catalog::open(&c.database_path)?;
    let report = mine_directory(&mut catalog, &Id3TagReader, &c.music_source_dir)?;
    catalog.close()?;
    Ok(report)
}
