//! The audiotags module reads the raw tag bundle out of an audio file. It does no normalization:
//! missing frames are reported as `None` and left for the metadata module to fill in.
//!
//! Both ID3v2 tags and ID3v1 trailers are read. When a file carries both, the ID3v2 frames win.

use crate::error::{MinerError, Result};
use id3::{ErrorKind as Id3ErrorKind, TagLike};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, warn};

/// The tag fields of a single file, exactly as found in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTagBundle {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub track_number: Option<u32>,
    pub track_total: Option<u32>,
}

/// Something that can extract a [`RawTagBundle`] from an open audio file.
pub trait TagReader {
    /// Fails with [`MinerError::TagParse`] when the file is not a recognized tagged audio format.
    fn read_tags(&self, path: &Path, file: &mut File) -> Result<RawTagBundle>;
}

/// Reads ID3v2 and ID3v1 tags from MP3 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Id3TagReader;

impl TagReader for Id3TagReader {
    fn read_tags(&self, path: &Path, file: &mut File) -> Result<RawTagBundle> {
        let tag = match id3::v1v2::read_from(&mut *file) {
            Ok(tag) => tag,
            Err(e) if matches!(e.kind, Id3ErrorKind::NoTag) => {
                if starts_with_mpeg_frame(file).map_err(|e| MinerError::io(path, e))? {
                    debug!("No ID3 tag in {}, treating it as untagged", path.display());
                    return Ok(RawTagBundle::default());
                }
                return Err(MinerError::TagParse {
                    path: path.to_path_buf(),
                    reason: "no ID3 tag and no MPEG audio frame found".to_string(),
                });
            }
            Err(mut e) => match e.partial_tag.take() {
                Some(tag) => {
                    warn!("Recovered a partial ID3 tag from {}: {}", path.display(), e.description);
                    tag
                }
                None => {
                    return Err(MinerError::TagParse {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    })
                }
            },
        };

        Ok(RawTagBundle {
            title: _get_text(tag.title()),
            artist: _get_text(tag.artist()),
            album: _get_text(tag.album()),
            genre: tag.genre_parsed().map(|g| g.trim_end_matches('\0').to_string()),
            year: tag.year().or_else(|| tag.date_recorded().map(|ts| ts.year)),
            track_number: tag.track(),
            track_total: tag.total_tracks(),
        })
    }
}

fn _get_text(value: Option<&str>) -> Option<String> {
    // Some taggers pad text frames with NUL bytes.
    value.map(|s| s.trim_end_matches('\0').to_string())
}

/// Check whether the file begins with an MPEG audio frame sync word (11 set bits).
fn starts_with_mpeg_frame(file: &mut File) -> std::io::Result<bool> {
    file.seek(SeekFrom::Start(0))?;
    let mut header = [0u8; 2];
    match file.read_exact(&mut header) {
        Ok(()) => Ok(header[0] == 0xFF && header[1] & 0xE0 == 0xE0),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}
