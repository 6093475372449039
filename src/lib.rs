pub mod audiotags;
pub mod catalog;
pub mod common;
pub mod config;
pub mod error;
pub mod locator;
pub mod metadata;
pub mod miner;

pub use audiotags::{Id3TagReader, RawTagBundle, TagReader};
pub use catalog::{Catalog, CatalogStats, RolaId};
pub use config::Config;
pub use error::{MinerError, MinerExpectedError, Result};
pub use metadata::{normalize, CanonicalMetadata, TrackPosition};
pub use miner::{mine, mine_directory, process_file, FileFailure, MiningReport};

#[cfg(test)]
mod testing;

#[cfg(test)]
mod metadata_test;
