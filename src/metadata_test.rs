use crate::audiotags::RawTagBundle;
use crate::metadata::*;

fn full_bundle() -> RawTagBundle {
    RawTagBundle {
        title: Some("Paranoid Android".to_string()),
        artist: Some("Radiohead".to_string()),
        album: Some("OK Computer".to_string()),
        genre: Some("Alternative".to_string()),
        year: Some(1997),
        track_number: Some(2),
        track_total: Some(12),
    }
}

#[test]
fn test_normalize_keeps_present_values() {
    let metadata = normalize(&full_bundle());
    assert_eq!(
        metadata,
        CanonicalMetadata {
            title: "Paranoid Android".to_string(),
            artist: "Radiohead".to_string(),
            album: "OK Computer".to_string(),
            genre: "Alternative".to_string(),
            year: 1997,
            track: TrackPosition { number: 2, total: 12 },
        }
    );
}

#[test]
fn test_normalize_empty_bundle() {
    let metadata = normalize(&RawTagBundle::default());
    assert_eq!(
        metadata,
        CanonicalMetadata {
            title: UNKNOWN.to_string(),
            artist: UNKNOWN.to_string(),
            album: UNKNOWN.to_string(),
            genre: UNKNOWN.to_string(),
            year: 1,
            track: TrackPosition { number: 1, total: 1 },
        }
    );
    assert_eq!(UNKNOWN, "Unknown");
}

#[test]
fn test_normalize_zero_and_blank_values() {
    let raw = RawTagBundle {
        title: Some(String::new()),
        artist: Some("   ".to_string()),
        album: Some("".to_string()),
        genre: Some("\t".to_string()),
        year: Some(0),
        track_number: Some(0),
        track_total: Some(0),
    };
    assert_eq!(normalize(&raw), normalize(&RawTagBundle::default()));
}

#[test]
fn test_normalize_each_field_falls_back_independently() {
    let cases: [(fn(&mut RawTagBundle), fn(&CanonicalMetadata) -> bool); 7] = [
        (|r| r.title = None, |m| m.title == UNKNOWN),
        (|r| r.artist = None, |m| m.artist == UNKNOWN),
        (|r| r.album = None, |m| m.album == UNKNOWN),
        (|r| r.genre = None, |m| m.genre == UNKNOWN),
        (|r| r.year = None, |m| m.year == 1),
        (|r| r.track_number = None, |m| m.track.number == 1),
        (|r| r.track_total = Some(0), |m| m.track.total == 1),
    ];

    let expected_untouched = normalize(&full_bundle());
    for (blank, check) in cases {
        let mut raw = full_bundle();
        blank(&mut raw);
        let metadata = normalize(&raw);
        assert!(check(&metadata), "fallback not applied: {metadata:?}");

        // Only the blanked field may differ from the fully tagged result.
        let differing = [
            metadata.title != expected_untouched.title,
            metadata.artist != expected_untouched.artist,
            metadata.album != expected_untouched.album,
            metadata.genre != expected_untouched.genre,
            metadata.year != expected_untouched.year,
            metadata.track.number != expected_untouched.track.number,
            metadata.track.total != expected_untouched.track.total,
        ];
        assert_eq!(differing.iter().filter(|d| **d).count(), 1, "{metadata:?}");
    }
}

#[test]
fn test_normalize_is_idempotent() {
    let partial = RawTagBundle {
        title: Some("Only Title".to_string()),
        year: Some(0),
        track_total: Some(9),
        ..RawTagBundle::default()
    };
    for raw in [full_bundle(), partial, RawTagBundle::default()] {
        let once = normalize(&raw);
        let twice = normalize(&RawTagBundle::from(&once));
        assert_eq!(once, twice);
    }
}

#[test]
fn test_normalize_keeps_negative_year() {
    let raw = RawTagBundle {
        year: Some(-500),
        ..full_bundle()
    };
    assert_eq!(normalize(&raw).year, -500);
}
