//! The metadata module turns a raw tag bundle into the canonical metadata that gets catalogued.
//!
//! Every field of [`CanonicalMetadata`] is guaranteed to be filled in: absent or blank strings become
//! [`UNKNOWN`] and absent or zero numbers become `1`. A genuine `1` in the tags is therefore
//! indistinguishable from a missing value.

use crate::audiotags::RawTagBundle;

pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackPosition {
    pub number: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: i32,
    pub track: TrackPosition,
}

fn _or_unknown(x: Option<&str>) -> String {
    match x {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn _or_one<T: Default + PartialEq + From<u8>>(x: Option<T>) -> T {
    match x {
        Some(n) if n != T::default() => n,
        _ => T::from(1),
    }
}

/// Fill every missing field of `raw` with its fallback. Never fails.
pub fn normalize(raw: &RawTagBundle) -> CanonicalMetadata {
    CanonicalMetadata {
        title: _or_unknown(raw.title.as_deref()),
        artist: _or_unknown(raw.artist.as_deref()),
        album: _or_unknown(raw.album.as_deref()),
        genre: _or_unknown(raw.genre.as_deref()),
        year: _or_one(raw.year),
        track: TrackPosition {
            number: _or_one(raw.track_number),
            total: _or_one(raw.track_total),
        },
    }
}

impl From<&CanonicalMetadata> for RawTagBundle {
    fn from(m: &CanonicalMetadata) -> Self {
        RawTagBundle {
            title: Some(m.title.clone()),
            artist: Some(m.artist.clone()),
            album: Some(m.album.clone()),
            genre: Some(m.genre.clone()),
            year: Some(m.year),
            track_number: Some(m.track.number),
            track_total: Some(m.track.total),
        }
    }
}
