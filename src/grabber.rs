//! Frame addressing and export.
//!
//! [`FrameGrabber`] owns the one open video, keeps track of the current
//! frame, translates between time and frame-index addressing, and exports the
//! current frame as an image.
//!
//! Every operation is all-or-nothing: when it fails, the previously loaded
//! video, the current index, and the current frame are exactly as they were.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use image::{DynamicImage, imageops::FilterType};

use crate::{
    conversion,
    decoder::{FfmpegDecoder, VideoDecoder},
    encoder::{ImageEncoder, ImageFileEncoder},
    error::StillframeError,
    export::ExportRequest,
    files,
    format::ImageFormat,
    frame::DecodedFrame,
    metadata::VideoMetadata,
    validation::{self, ValidationReport},
};

/// Base name used for default output files when the video was not opened
/// from a path.
const FALLBACK_BASE_NAME: &str = "video";

/// The open video together with its current frame.
///
/// A video is only adopted after frame 0 decoded, so there is always a
/// current frame while one is loaded.
struct LoadedVideo<D> {
    decoder: D,
    path: Option<PathBuf>,
    frame: DecodedFrame,
}

/// Owns one open video and the frame currently shown from it.
///
/// Generic over the [`VideoDecoder`] so the addressing rules do not depend
/// on FFmpeg; [`FrameGrabber::open`] uses [`FfmpegDecoder`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use stillframe::{ExportRequest, FrameGrabber};
///
/// let mut grabber = FrameGrabber::open("clip.mp4")?;
/// grabber.seek_to_time(Duration::from_secs(3))?;
/// grabber.advance()?;
///
/// let path = grabber.default_output_path("stills", stillframe::ImageFormat::Jpeg)?;
/// grabber.export_current_frame(&ExportRequest::new(path))?;
/// # Ok::<(), stillframe::StillframeError>(())
/// ```
pub struct FrameGrabber<D: VideoDecoder = FfmpegDecoder> {
    video: Option<LoadedVideo<D>>,
}

impl<D: VideoDecoder> Debug for FrameGrabber<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FrameGrabber")
            .field("path", &self.source_path())
            .field("metadata", &self.metadata())
            .field("current_index", &self.current_index())
            .finish_non_exhaustive()
    }
}

impl<D: VideoDecoder> Default for FrameGrabber<D> {
    fn default() -> Self {
        Self { video: None }
    }
}

impl FrameGrabber {
    /// Create a grabber with no video loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a video with FFmpeg and show its first frame.
    ///
    /// # Errors
    ///
    /// Returns [`StillframeError::FileOpen`] if the file cannot be opened,
    /// [`StillframeError::NoVideoStream`] if it has no video,
    /// [`StillframeError::EmptyVideo`] if it has no frames,
    /// [`StillframeError::InvalidFrameRate`] if it reports no usable frame
    /// rate, or a decode error if frame 0 cannot be decoded.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stillframe::FrameGrabber;
    ///
    /// let grabber = FrameGrabber::open("video.mp4")?;
    /// assert_eq!(grabber.current_index(), Some(0));
    /// # Ok::<(), stillframe::StillframeError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StillframeError> {
        let mut grabber = Self::new();
        grabber.load(path)?;
        Ok(grabber)
    }
}

impl<D: VideoDecoder> FrameGrabber<D> {
    /// Create a grabber around an already opened decoder and show its first
    /// frame.
    ///
    /// # Errors
    ///
    /// Same as [`load_decoder`](FrameGrabber::load_decoder).
    pub fn with_decoder(decoder: D) -> Result<Self, StillframeError> {
        let mut grabber = Self::default();
        grabber.load_decoder(decoder)?;
        Ok(grabber)
    }

    /// Open `path` and make it the loaded video, replacing any previous one.
    ///
    /// On failure the previously loaded video stays loaded, at the same
    /// frame.
    ///
    /// # Errors
    ///
    /// Returns the decoder's open error, [`StillframeError::EmptyVideo`] for
    /// a video without frames, or the error from decoding frame 0.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), StillframeError> {
        let path = path.as_ref();
        let decoder = D::open(path)?;
        self.adopt(decoder, Some(path.to_path_buf()))
    }

    /// Make `decoder` the loaded video, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StillframeError::EmptyVideo`] for a video without frames,
    /// or the error from decoding frame 0. The previous video is kept.
    pub fn load_decoder(&mut self, decoder: D) -> Result<(), StillframeError> {
        self.adopt(decoder, None)
    }

    fn adopt(&mut self, mut decoder: D, path: Option<PathBuf>) -> Result<(), StillframeError> {
        let metadata = decoder.metadata();
        if metadata.frame_count == 0 {
            return Err(StillframeError::EmptyVideo);
        }
        let summary = format!(
            "{}x{} @ {:.2} fps, {} frames",
            metadata.width, metadata.height, metadata.frames_per_second, metadata.frame_count
        );

        let first = decoder.decode_frame(0)?;
        let frame = DecodedFrame::new(0, first);

        match &path {
            Some(path) => log::info!("Loaded video {} ({summary})", path.display()),
            None => log::info!("Loaded video ({summary})"),
        }

        // The previous decoder is dropped here, releasing its resources.
        self.video = Some(LoadedVideo {
            decoder,
            path,
            frame,
        });
        Ok(())
    }

    /// Release the loaded video, if any.
    pub fn close(&mut self) {
        if let Some(video) = self.video.take() {
            log::debug!(
                "Closed video{}",
                video
                    .path
                    .as_deref()
                    .map(|path| format!(" {}", path.display()))
                    .unwrap_or_default()
            );
        }
    }

    /// Returns `true` if a video is loaded.
    pub fn is_open(&self) -> bool {
        self.video.is_some()
    }

    /// Metadata of the loaded video.
    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.video.as_ref().map(|video| video.decoder.metadata())
    }

    /// Check the loaded video's metadata for problems.
    pub fn validate(&self) -> Option<ValidationReport> {
        self.metadata().map(validation::validate_metadata)
    }

    /// The loaded decoder.
    pub fn decoder(&self) -> Option<&D> {
        self.video.as_ref().map(|video| &video.decoder)
    }

    /// Path the loaded video was opened from, if it came from a path.
    pub fn source_path(&self) -> Option<&Path> {
        self.video.as_ref().and_then(|video| video.path.as_deref())
    }

    /// Index of the frame currently shown.
    pub fn current_index(&self) -> Option<u64> {
        self.video.as_ref().map(|video| video.frame.index())
    }

    /// Display time of the current frame.
    pub fn current_timestamp(&self) -> Option<Duration> {
        let video = self.video.as_ref()?;
        Some(conversion::frame_number_to_timestamp(
            video.frame.index(),
            video.decoder.metadata().frames_per_second,
        ))
    }

    /// A copy of the current frame. Later seeks do not affect it.
    pub fn current_frame(&self) -> Option<DecodedFrame> {
        self.video.as_ref().map(|video| video.frame.clone())
    }

    /// `"MM:SS / MM:SS"` for the current frame and the last frame.
    pub fn position_label(&self) -> Option<String> {
        let video = self.video.as_ref()?;
        let metadata = video.decoder.metadata();
        let fps = metadata.frames_per_second;
        let current = conversion::frame_number_to_timestamp(video.frame.index(), fps);
        let last =
            conversion::frame_number_to_timestamp(metadata.last_frame().unwrap_or(0), fps);
        Some(format!(
            "{} / {}",
            conversion::format_clock(current),
            conversion::format_clock(last)
        ))
    }

    /// Decode `frame_number` and make it the current frame.
    ///
    /// # Errors
    ///
    /// - [`StillframeError::NoVideoLoaded`] if nothing is loaded.
    /// - [`StillframeError::FrameOutOfRange`] if `frame_number` is not below
    ///   the frame count.
    /// - The decoder's error if the frame cannot be decoded.
    ///
    /// The current index and frame only change on success.
    pub fn seek_to_frame(&mut self, frame_number: u64) -> Result<(), StillframeError> {
        let video = self.video.as_mut().ok_or(StillframeError::NoVideoLoaded)?;

        let total_frames = video.decoder.metadata().frame_count;
        if frame_number >= total_frames {
            return Err(StillframeError::FrameOutOfRange {
                frame_number,
                total_frames,
            });
        }

        let image = video.decoder.decode_frame(frame_number).inspect_err(|error| {
            log::warn!("Failed to decode frame {frame_number}: {error}");
        })?;
        video.frame = DecodedFrame::new(frame_number, image);

        log::trace!("Current frame is now {frame_number}");
        Ok(())
    }

    /// Seek to the frame displayed at `timestamp`.
    ///
    /// The index is `floor(seconds * frames_per_second)`, so every timestamp
    /// inside one frame interval selects the same frame.
    ///
    /// # Errors
    ///
    /// - [`StillframeError::NoVideoLoaded`] if nothing is loaded.
    /// - [`StillframeError::InvalidFrameRate`] if the video reports a frame
    ///   rate of zero or less; no seek is attempted.
    /// - Any error from [`seek_to_frame`](FrameGrabber::seek_to_frame).
    pub fn seek_to_time(&mut self, timestamp: Duration) -> Result<(), StillframeError> {
        let metadata = self.metadata().ok_or(StillframeError::NoVideoLoaded)?;
        let frames_per_second = metadata.frames_per_second;
        if frames_per_second <= 0.0 {
            return Err(StillframeError::InvalidFrameRate(frames_per_second));
        }

        let frame_number = conversion::timestamp_to_frame_number(timestamp, frames_per_second);
        log::debug!(
            "Seeking to {:.3}s (frame {frame_number})",
            timestamp.as_secs_f64()
        );
        self.seek_to_frame(frame_number)
    }

    /// [`seek_to_time`](FrameGrabber::seek_to_time) with a millisecond offset.
    pub fn seek_to_millis(&mut self, milliseconds: u64) -> Result<(), StillframeError> {
        self.seek_to_time(Duration::from_millis(milliseconds))
    }

    /// Move to the next frame.
    ///
    /// # Errors
    ///
    /// At the last frame returns [`StillframeError::FrameOutOfRange`] and
    /// stays put; otherwise as [`seek_to_frame`](FrameGrabber::seek_to_frame).
    pub fn advance(&mut self) -> Result<(), StillframeError> {
        let current = self.current_index().ok_or(StillframeError::NoVideoLoaded)?;
        self.seek_to_frame(current.saturating_add(1))
    }

    /// Move to the previous frame.
    ///
    /// # Errors
    ///
    /// At frame 0 returns [`StillframeError::NoPreviousFrame`] and stays put;
    /// otherwise as [`seek_to_frame`](FrameGrabber::seek_to_frame).
    pub fn step_back(&mut self) -> Result<(), StillframeError> {
        let current = self.current_index().ok_or(StillframeError::NoVideoLoaded)?;
        let previous = current
            .checked_sub(1)
            .ok_or(StillframeError::NoPreviousFrame)?;
        self.seek_to_frame(previous)
    }

    /// Default export path for the current frame inside `directory`:
    /// `{video_base_name}_frame_{index:06}.{ext}`.
    ///
    /// # Errors
    ///
    /// Returns [`StillframeError::NoFrameDecoded`] if nothing is loaded.
    pub fn default_output_path<P: AsRef<Path>>(
        &self,
        directory: P,
        format: ImageFormat,
    ) -> Result<PathBuf, StillframeError> {
        let video = self.video.as_ref().ok_or(StillframeError::NoFrameDecoded)?;
        let source = video
            .path
            .as_deref()
            .unwrap_or_else(|| Path::new(FALLBACK_BASE_NAME));
        let file_name = files::output_file_name(source, video.frame.index(), format);
        Ok(directory.as_ref().join(file_name))
    }

    /// Export the current frame with the `image`-crate encoder.
    ///
    /// Returns the path actually written, which has an extension appended
    /// if the request's path had none.
    ///
    /// # Errors
    ///
    /// See [`export_current_frame_with`](FrameGrabber::export_current_frame_with).
    pub fn export_current_frame(
        &self,
        request: &ExportRequest,
    ) -> Result<PathBuf, StillframeError> {
        let encoder = ImageFileEncoder::new().with_jpeg_quality(request.jpeg_quality);
        self.export_current_frame_with(&encoder, request)
    }

    /// Export the current frame through `encoder`.
    ///
    /// Resolves the output size, resamples with a Lanczos filter when the
    /// size differs from the native one, resolves the format, and hands the
    /// result to the encoder.
    ///
    /// # Errors
    ///
    /// - [`StillframeError::NoFrameDecoded`] if no frame is current.
    /// - [`StillframeError::InvalidDimensions`] if the resolved size is empty.
    /// - [`StillframeError::UnsupportedImageFormat`] if the format cannot be
    ///   determined or contradicts the path.
    /// - The encoder's error if the directory or file cannot be written.
    pub fn export_current_frame_with<E: ImageEncoder + ?Sized>(
        &self,
        encoder: &E,
        request: &ExportRequest,
    ) -> Result<PathBuf, StillframeError> {
        let frame = self
            .video
            .as_ref()
            .map(|video| &video.frame)
            .ok_or(StillframeError::NoFrameDecoded)?;

        let native = frame.size();
        let size = request.size.resolve(native)?;
        let (format, path) = request.resolve_target()?;

        let image = if size == native {
            DynamicImage::ImageRgb8(frame.image().clone())
        } else {
            log::debug!("Resampling frame {} from {native} to {size}", frame.index());
            DynamicImage::ImageRgb8(image::imageops::resize(
                frame.image(),
                size.width,
                size.height,
                FilterType::Lanczos3,
            ))
        };

        encoder.encode(&image, format, &path)?;

        log::info!(
            "Exported frame {} as {format} ({size}) to {}",
            frame.index(),
            path.display()
        );
        Ok(path)
    }
}
