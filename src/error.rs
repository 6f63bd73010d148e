//! Error types for the `stillframe` crate.
//!
//! This module defines [`StillframeError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry enough context (paths,
//! frame numbers, upstream messages) to be shown to a user as-is.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `stillframe` operations.
///
/// None of these conditions is fatal: every operation that returns one
/// leaves the previously loaded video, frame index, and decoded frame as
/// they were.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StillframeError {
    /// The video file could not be opened.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::FrameGrabber::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The video stream reports zero frames.
    #[error("Video contains no frames")]
    EmptyVideo,

    /// An operation needed an open video but none is loaded.
    #[error("No video is loaded")]
    NoVideoLoaded,

    /// Export was requested before any frame was decoded.
    #[error("No frame has been decoded yet")]
    NoFrameDecoded,

    /// The requested frame number is outside `[0, total_frames)`.
    #[error("Frame {frame_number} is out of range (video has {total_frames} frames)")]
    FrameOutOfRange {
        /// The frame number that was requested.
        frame_number: u64,
        /// The total number of frames in the video.
        total_frames: u64,
    },

    /// Stepping back was requested while at the first frame.
    #[error("Already at the first frame")]
    NoPreviousFrame,

    /// The source reports a frame rate that cannot address frames by time.
    #[error("Invalid frame rate: {0} fps")]
    InvalidFrameRate(f64),

    /// An in-range video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The requested output image format is not supported.
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    /// A size with a zero dimension was used where a real raster is needed.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while resampling or encoding.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for StillframeError {
    fn from(error: FfmpegError) -> Self {
        StillframeError::FfmpegError(error.to_string())
    }
}
