//! Validation integration tests.
//!
//! Fixture-based tests require files from `tests/fixtures/generate_fixtures.sh`.

mod common;

use std::{path::Path, time::Duration};

use common::{ScriptedDecoder, metadata, sample_video_path};
use stillframe::{FrameGrabber, validate_metadata};

#[test]
fn healthy_metadata_is_valid() {
    let report = validate_metadata(&metadata(1920, 1080, 30.0, 300));

    assert!(report.is_valid());
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert!(report.info.iter().any(|item| item.contains("Video:")));
}

#[test]
fn zero_frame_rate_is_an_error() {
    let report = validate_metadata(&metadata(1920, 1080, 0.0, 300));

    assert!(!report.is_valid());
    assert!(report.errors.iter().any(|item| item.contains("Frame rate")));
}

#[test]
fn zero_dimensions_are_an_error() {
    let report = validate_metadata(&metadata(0, 1080, 30.0, 300));

    assert!(!report.is_valid());
    assert!(
        report
            .errors
            .iter()
            .any(|item| item.contains("Invalid video dimensions"))
    );
}

#[test]
fn empty_video_is_an_error() {
    let report = validate_metadata(&metadata(640, 480, 25.0, 0));
    assert!(!report.is_valid());
}

#[test]
fn inconsistent_frame_count_is_a_warning() {
    let mut video = metadata(640, 480, 25.0, 250);
    video.duration = Duration::from_secs(20);

    let report = validate_metadata(&video);
    assert!(report.is_valid());
    assert!(
        report
            .warnings
            .iter()
            .any(|item| item.contains("variable"))
    );
}

#[test]
fn report_display_prefixes() {
    let mut video = metadata(0, 0, 500.0, 10);
    video.duration = Duration::ZERO;

    let text = validate_metadata(&video).to_string();
    assert!(text.contains("[INFO] Video:"));
    assert!(text.contains("[WARN]"));
    assert!(text.contains("[ERROR]"));
}

#[test]
fn grabber_validates_loaded_video() {
    let grabber = FrameGrabber::with_decoder(ScriptedDecoder::with_frames(30))
        .expect("Failed to load scripted decoder");
    let report = grabber.validate().expect("Expected a report");
    assert!(report.is_valid());

    let empty: FrameGrabber<ScriptedDecoder> = FrameGrabber::default();
    assert!(empty.validate().is_none());
}

#[test]
fn validate_fixture_video() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let grabber = FrameGrabber::open(path).expect("Failed to open fixture");
    let report = grabber.validate().expect("Expected a report");

    assert!(report.is_valid(), "Fixture should be valid: {report}");
    assert!(report.info.iter().any(|item| item.contains("Video:")));
}
