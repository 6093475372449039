use id3::{Tag, TagLike, Timestamp, Version};
use std::fs;
use std::path::Path;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

pub fn init() -> TempDir {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
    TempDir::new().expect("failed to create temp dir")
}

/// A single MPEG-1 Layer III frame header followed by silence. Enough for the tag reader to accept
/// the file as audio; not decodable audio.
pub fn mpeg_frame() -> Vec<u8> {
    let mut frame = vec![0xFF, 0xFB, 0x90, 0x64];
    frame.resize(417, 0);
    frame
}

#[derive(Debug, Clone)]
pub struct TagFixture<'a> {
    pub title: Option<&'a str>,
    pub artist: Option<&'a str>,
    pub album: Option<&'a str>,
    pub genre: Option<&'a str>,
    pub year: Option<i32>,
    pub track: Option<u32>,
    pub total_tracks: Option<u32>,
}

impl Default for TagFixture<'_> {
    fn default() -> Self {
        TagFixture {
            title: Some("Test Title"),
            artist: Some("Test Artist"),
            album: Some("Test Album"),
            genre: Some("Test Genre"),
            year: Some(2023),
            track: Some(1),
            total_tracks: Some(12),
        }
    }
}

/// Write an MP3 with an ID3v2.4 tag carrying the fixture fields.
pub fn write_tagged_mp3(path: &Path, fixture: &TagFixture) {
    let mut tag = Tag::new();
    if let Some(v) = fixture.title {
        tag.set_title(v);
    }
    if let Some(v) = fixture.artist {
        tag.set_artist(v);
    }
    if let Some(v) = fixture.album {
        tag.set_album(v);
    }
    if let Some(v) = fixture.genre {
        tag.set_genre(v);
    }
    if let Some(v) = fixture.year {
        tag.set_year(v);
        tag.set_date_recorded(Timestamp {
            year: v,
            month: None,
            day: None,
            hour: None,
            minute: None,
            second: None,
        });
    }
    if let Some(v) = fixture.track {
        tag.set_track(v);
    }
    if let Some(v) = fixture.total_tracks {
        tag.set_total_tracks(v);
    }

    let mut bytes = Vec::new();
    tag.write_to(&mut bytes, Version::Id3v24).expect("failed to encode tag");
    bytes.extend(mpeg_frame());
    fs::write(path, bytes).expect("failed to write mp3");
}

#[derive(Debug, Clone)]
pub struct Id3v1Fixture<'a> {
    pub title: &'a str,
    pub artist: &'a str,
    pub album: &'a str,
    pub year: &'a str,
    pub genre: u8,
}

fn _v1_field(bytes: &mut Vec<u8>, value: &str, len: usize) {
    let mut field = value.as_bytes().to_vec();
    field.resize(len, 0);
    bytes.extend(field);
}

/// Write an MP3 whose only tag is a 128 byte ID3v1 trailer.
pub fn write_id3v1_mp3(path: &Path, fixture: &Id3v1Fixture) {
    let mut bytes = mpeg_frame();
    bytes.extend(b"TAG");
    _v1_field(&mut bytes, fixture.title, 30);
    _v1_field(&mut bytes, fixture.artist, 30);
    _v1_field(&mut bytes, fixture.album, 30);
    _v1_field(&mut bytes, fixture.year, 4);
    _v1_field(&mut bytes, "", 30);
    bytes.push(fixture.genre);
    fs::write(path, bytes).expect("failed to write mp3");
}

/// Write an MP3 with no tag at all.
pub fn write_untagged_mp3(path: &Path) {
    fs::write(path, mpeg_frame()).expect("failed to write mp3");
}

/// Write a file with an audio extension whose contents are not audio.
pub fn write_corrupt_mp3(path: &Path) {
    fs::write(path, "this is not an mp3 file").expect("failed to write file");
}
