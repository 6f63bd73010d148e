//! # stillframe
//!
//! Grab still frames from video files.
//!
//! `stillframe` opens a video, lets you move to any frame by index or by
//! timestamp, step through it frame by frame or play it back, and export the
//! frame you are looking at as an image at its native size or any other
//! resolution. Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate and images are
//! written with the [`image`](https://crates.io/crates/image) crate.
//!
//! ## Quick Start
//!
//! ### Export a Frame
//!
//! ```no_run
//! use stillframe::{ExportRequest, FrameGrabber};
//!
//! let mut grabber = FrameGrabber::open("input.mp4").unwrap();
//! grabber.seek_to_frame(250).unwrap();
//! grabber
//!     .export_current_frame(&ExportRequest::new("frame_250.png"))
//!     .unwrap();
//! ```
//!
//! ### Seek by Time and Resize
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use stillframe::{ExportRequest, FrameGrabber, ImageFormat};
//!
//! let mut grabber = FrameGrabber::open("input.mp4").unwrap();
//! grabber.seek_to_time(Duration::from_millis(12_500)).unwrap();
//!
//! // 1280 wide, height derived from the video's proportions.
//! let request = ExportRequest::new("stills/frame")
//!     .with_format(ImageFormat::Webp)
//!     .with_width(1280);
//! let written = grabber.export_current_frame(&request).unwrap();
//! assert_eq!(written.extension().unwrap(), "webp");
//! ```
//!
//! ### Step Through Frames
//!
//! ```no_run
//! use stillframe::FrameGrabber;
//!
//! let mut grabber = FrameGrabber::open("input.mp4").unwrap();
//! while grabber.advance().is_ok() {
//!     println!("{}", grabber.position_label().unwrap());
//! }
//! ```
//!
//! ## Features
//!
//! - **Frame addressing**: by zero-based index or by timestamp, where a
//!   timestamp selects `floor(seconds * fps)`
//! - **Stepping and playback**: `advance`/`step_back` and a
//!   [`PlaybackDriver`] that ticks at a fixed interval
//! - **Export**: JPEG, PNG, BMP, TIFF, and WebP, with the format taken from
//!   the path or given explicitly
//! - **Resizing**: exact sizes, one dimension with the other derived, or a
//!   bounding box that keeps the aspect ratio; Lanczos resampling
//! - **Presets**: common screen and social media resolutions
//! - **Validation**: inspect a video's metadata for degenerate values
//! - **Failure safety**: a failed operation never changes the loaded video,
//!   the current index, or the current frame
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod about;
pub mod conversion;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod export;
pub mod ffmpeg;
pub mod files;
pub mod format;
pub mod frame;
pub mod grabber;
pub mod metadata;
pub mod playback;
pub mod presets;
pub mod resize;
pub mod validation;

pub use about::AppInfo;
pub use decoder::{FfmpegDecoder, VideoDecoder};
pub use encoder::{DEFAULT_JPEG_QUALITY, ImageEncoder, ImageFileEncoder};
pub use error::StillframeError;
pub use export::{ExportRequest, OutputSize};
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use format::{ImageFormat, VIDEO_EXTENSIONS};
pub use frame::DecodedFrame;
pub use grabber::FrameGrabber;
pub use metadata::VideoMetadata;
pub use playback::{
    CancellationToken, DEFAULT_TICK_INTERVAL, PlaybackDriver, PlaybackState, TickOutcome,
};
pub use presets::{PRESETS, PresetCategory, ResolutionPreset, find_preset, presets_in};
pub use resize::{Size, aspect_ratio_label, aspect_ratio_size, fit_within};
pub use validation::{ValidationReport, validate_metadata};
