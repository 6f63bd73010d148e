//! Time and frame-number conversions.
//!
//! Helpers for pixel-data copying, timestamp arithmetic, and other shared
//! logic that does not belong in any single public module. The frame/time
//! helpers are public because callers building their own front end need the
//! same truncation rules the grabber uses.

use std::time::Duration;

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy pixel data from an FFmpeg video frame into a tightly-packed buffer.
///
/// `bytes_per_pixel` is the number of bytes per pixel for the output format
/// (3 for RGB24).
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let expected_stride = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

/// Convert a [`Duration`] to a frame number using the video's frame rate.
///
/// Truncates toward zero: every timestamp inside one frame interval maps to
/// the same frame. Returns 0 for a non-positive frame rate.
///
/// ```
/// use std::time::Duration;
///
/// use stillframe::conversion::timestamp_to_frame_number;
///
/// assert_eq!(timestamp_to_frame_number(Duration::from_millis(1000), 30.0), 30);
/// assert_eq!(timestamp_to_frame_number(Duration::from_millis(999), 30.0), 29);
/// ```
pub fn timestamp_to_frame_number(timestamp: Duration, frames_per_second: f64) -> u64 {
    if frames_per_second <= 0.0 {
        return 0;
    }
    (timestamp.as_secs_f64() * frames_per_second).floor() as u64
}

/// Convert a frame number to the timestamp at which it is displayed.
///
/// Returns [`Duration::ZERO`] for a non-positive frame rate.
pub fn frame_number_to_timestamp(frame_number: u64, frames_per_second: f64) -> Duration {
    if frames_per_second <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(frame_number as f64 / frames_per_second)
}

/// Format a duration as a `MM:SS` clock, minutes not wrapping at the hour.
pub fn format_clock(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Rescale a PTS value from stream time base to seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Rescale a PTS value to a frame number.
///
/// Rounds to the nearest frame so that container timestamps a few ticks
/// early still land on the right index.
pub(crate) fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts_to_seconds(pts, time_base);
    (seconds * frames_per_second).round().max(0.0) as u64
}

/// Convert a frame number to a seek timestamp in AV_TIME_BASE (microseconds).
///
/// `input_context.seek()` (via `avformat_seek_file` with `stream_index = -1`)
/// expects timestamps in AV_TIME_BASE (1/1_000_000).
pub(crate) fn frame_number_to_seek_timestamp(frame_number: u64, frames_per_second: f64) -> i64 {
    let seconds = frame_number as f64 / frames_per_second;
    (seconds * 1_000_000.0) as i64
}
