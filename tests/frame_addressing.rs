//! Frame addressing integration tests.
//!
//! These run against an in-memory decoder, so they need no fixture files.

mod common;

use std::time::Duration;

use common::{ScriptedDecoder, frame_colour, grabber_with_frames, metadata};
use stillframe::{FrameGrabber, StillframeError};

#[test]
fn load_shows_first_frame() {
    let grabber = grabber_with_frames(10);

    assert!(grabber.is_open());
    assert_eq!(grabber.current_index(), Some(0));
    assert_eq!(grabber.current_timestamp(), Some(Duration::ZERO));

    let frame = grabber.current_frame().expect("Expected a current frame");
    assert_eq!(frame.index(), 0);
    assert_eq!((frame.width(), frame.height()), (16, 9));
    assert_eq!(*frame.image().get_pixel(0, 0), frame_colour(0));
}

#[test]
fn every_seek_reports_requested_index() {
    let mut grabber = grabber_with_frames(48);

    for frame_number in (0..48).rev() {
        grabber
            .seek_to_frame(frame_number)
            .expect("Failed to seek in range");
        let frame = grabber.current_frame().expect("Expected a current frame");
        assert_eq!(frame.index(), frame_number);
        assert_eq!(*frame.image().get_pixel(3, 3), frame_colour(frame_number));
    }
}

#[test]
fn seek_out_of_range_keeps_position() {
    let mut grabber = grabber_with_frames(10);
    grabber.seek_to_frame(4).expect("Failed to seek");

    for frame_number in [10, 11, u64::MAX] {
        let result = grabber.seek_to_frame(frame_number);
        assert!(matches!(
            result,
            Err(StillframeError::FrameOutOfRange {
                total_frames: 10,
                ..
            })
        ));
        assert_eq!(grabber.current_index(), Some(4));
    }

    let error_message = grabber.seek_to_frame(10).unwrap_err().to_string();
    assert!(
        error_message.contains("out of range"),
        "Error message should mention out of range: {error_message}",
    );
}

#[test]
fn seek_to_time_truncates() {
    let mut grabber = grabber_with_frames(100);

    grabber.seek_to_millis(1000).expect("Failed to seek to 1000ms");
    assert_eq!(grabber.current_index(), Some(30));

    grabber.seek_to_millis(999).expect("Failed to seek to 999ms");
    assert_eq!(grabber.current_index(), Some(29));

    grabber
        .seek_to_time(Duration::from_millis(1_033))
        .expect("Failed to seek by duration");
    assert_eq!(grabber.current_index(), Some(30));
}

#[test]
fn seek_to_time_past_end_fails() {
    let mut grabber = grabber_with_frames(30);
    grabber.seek_to_frame(7).expect("Failed to seek");

    let result = grabber.seek_to_time(Duration::from_secs(1));
    assert!(matches!(
        result,
        Err(StillframeError::FrameOutOfRange {
            frame_number: 30,
            total_frames: 30
        })
    ));
    assert_eq!(grabber.current_index(), Some(7));
}

#[test]
fn seek_to_time_rejects_zero_frame_rate() {
    let decoder = ScriptedDecoder::new(metadata(16, 9, 0.0, 5));
    let mut grabber = FrameGrabber::with_decoder(decoder).expect("Failed to load");
    let decoded_before = grabber.decoder().map(|decoder| decoder.decoded.len());

    let result = grabber.seek_to_millis(500);
    assert!(matches!(result, Err(StillframeError::InvalidFrameRate(_))));
    assert_eq!(grabber.current_index(), Some(0));
    assert_eq!(
        grabber.decoder().map(|decoder| decoder.decoded.len()),
        decoded_before,
        "No decode should be attempted"
    );
}

#[test]
fn advance_walks_to_last_frame() {
    let total_frames = 12;
    let mut grabber = grabber_with_frames(total_frames);

    for _ in 0..total_frames - 1 {
        grabber.advance().expect("Failed to advance");
    }
    assert_eq!(grabber.current_index(), Some(total_frames - 1));

    assert!(grabber.advance().is_err());
    assert_eq!(grabber.current_index(), Some(total_frames - 1));
}

#[test]
fn step_back_stops_at_first_frame() {
    let mut grabber = grabber_with_frames(5);
    grabber.seek_to_frame(2).expect("Failed to seek");

    grabber.step_back().expect("Failed to step back");
    grabber.step_back().expect("Failed to step back");
    assert_eq!(grabber.current_index(), Some(0));

    let result = grabber.step_back();
    assert!(matches!(result, Err(StillframeError::NoPreviousFrame)));
    assert_eq!(grabber.current_index(), Some(0));
}

#[test]
fn decode_failure_keeps_frame() {
    let decoder = ScriptedDecoder::with_frames(10).failing_on(&[6]);
    let mut grabber = FrameGrabber::with_decoder(decoder).expect("Failed to load");
    grabber.seek_to_frame(5).expect("Failed to seek");
    let before = grabber.current_frame();

    let result = grabber.advance();
    assert!(matches!(result, Err(StillframeError::VideoDecodeError(_))));
    assert_eq!(grabber.current_index(), Some(5));
    assert_eq!(grabber.current_frame(), before);

    // Other frames still decode.
    grabber.seek_to_frame(7).expect("Failed to seek past bad frame");
    assert_eq!(grabber.current_index(), Some(7));
}

#[test]
fn current_frame_is_a_copy() {
    let mut grabber = grabber_with_frames(10);
    let first = grabber.current_frame().expect("Expected a current frame");

    grabber.seek_to_frame(9).expect("Failed to seek");

    assert_eq!(first.index(), 0);
    assert_eq!(*first.image().get_pixel(0, 0), frame_colour(0));
}

#[test]
fn operations_without_video() {
    let mut grabber: FrameGrabber<ScriptedDecoder> = FrameGrabber::default();

    assert!(!grabber.is_open());
    assert!(grabber.current_frame().is_none());
    assert!(grabber.current_index().is_none());
    assert!(grabber.position_label().is_none());
    assert!(matches!(
        grabber.seek_to_frame(0),
        Err(StillframeError::NoVideoLoaded)
    ));
    assert!(matches!(
        grabber.seek_to_millis(0),
        Err(StillframeError::NoVideoLoaded)
    ));
    assert!(matches!(
        grabber.advance(),
        Err(StillframeError::NoVideoLoaded)
    ));
    assert!(matches!(
        grabber.step_back(),
        Err(StillframeError::NoVideoLoaded)
    ));
}

#[test]
fn empty_video_is_rejected() {
    let result = FrameGrabber::with_decoder(ScriptedDecoder::with_frames(0));
    assert!(matches!(result, Err(StillframeError::EmptyVideo)));
}

#[test]
fn failed_load_keeps_previous_video() {
    let mut grabber = grabber_with_frames(10);
    grabber.seek_to_frame(3).expect("Failed to seek");
    let before = grabber.current_frame();

    let result = grabber.load("this_file_does_not_exist.mp4");
    assert!(matches!(result, Err(StillframeError::FileOpen { .. })));

    let result = grabber.load_decoder(ScriptedDecoder::with_frames(0));
    assert!(matches!(result, Err(StillframeError::EmptyVideo)));

    let result = grabber.load_decoder(ScriptedDecoder::with_frames(10).failing_on(&[0]));
    assert!(matches!(result, Err(StillframeError::VideoDecodeError(_))));

    assert_eq!(grabber.current_index(), Some(3));
    assert_eq!(grabber.current_frame(), before);
    assert_eq!(grabber.metadata().map(|metadata| metadata.frame_count), Some(10));
}

#[test]
fn load_replaces_previous_video() {
    let mut grabber = grabber_with_frames(10);
    grabber.seek_to_frame(8).expect("Failed to seek");

    grabber
        .load_decoder(ScriptedDecoder::new(metadata(32, 18, 25.0, 50)))
        .expect("Failed to load second video");

    assert_eq!(grabber.current_index(), Some(0));
    assert_eq!(grabber.metadata().map(|metadata| metadata.size().width), Some(32));
    assert!(grabber.source_path().is_none());
}

#[test]
fn close_releases_video() {
    let mut grabber = grabber_with_frames(10);
    grabber.close();

    assert!(!grabber.is_open());
    assert!(grabber.metadata().is_none());
    assert!(grabber.current_frame().is_none());
}

#[test]
fn position_label_shows_current_and_last() {
    // 150 frames at 30 fps: the last frame is shown at 4.966s.
    let mut grabber = grabber_with_frames(150);
    assert_eq!(grabber.position_label().as_deref(), Some("00:00 / 00:04"));

    grabber.seek_to_frame(90).expect("Failed to seek");
    assert_eq!(grabber.position_label().as_deref(), Some("00:03 / 00:04"));
    assert_eq!(grabber.current_timestamp(), Some(Duration::from_secs(3)));
}

#[test]
fn sequential_access_decodes_each_frame_once() {
    let mut grabber = grabber_with_frames(5);
    while grabber.advance().is_ok() {}

    let decoded = grabber
        .decoder()
        .map(|decoder| decoder.decoded.clone())
        .unwrap_or_default();
    assert_eq!(decoded, vec![0, 1, 2, 3, 4]);
}
