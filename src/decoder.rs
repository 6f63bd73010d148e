//! Video decoding.
//!
//! [`VideoDecoder`] is the capability the [`FrameGrabber`](crate::FrameGrabber)
//! depends on: open a path, report [`VideoMetadata`], and decode one frame by
//! index. [`FfmpegDecoder`] is the implementation backed by FFmpeg through
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next).

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as FfmpegVideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::{conversion, error::StillframeError, metadata::VideoMetadata};

/// A source of decoded video frames addressed by zero-based index.
///
/// Implementations own whatever decoder-side resources an open video needs
/// and release them on drop.
pub trait VideoDecoder {
    /// Open the video at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, has no decodable video
    /// stream, or reports metadata that makes frame addressing impossible.
    fn open(path: &Path) -> Result<Self, StillframeError>
    where
        Self: Sized;

    /// Metadata captured when the video was opened.
    fn metadata(&self) -> &VideoMetadata;

    /// Decode the frame at `frame_number` as an RGB8 raster of the native
    /// size.
    ///
    /// Callers guarantee `frame_number < metadata().frame_count`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be produced. A failed call must
    /// not prevent later calls for other frames from succeeding.
    fn decode_frame(&mut self, frame_number: u64) -> Result<RgbImage, StillframeError>;
}

/// FFmpeg-backed [`VideoDecoder`].
///
/// Keeps the demuxer, decoder, and scaler open for the lifetime of the
/// value. Random access seeks to the nearest keyframe at or before the
/// target and decodes forward; requesting the frame right after the last
/// one decoded continues without seeking, which keeps playback cheap.
pub struct FfmpegDecoder {
    input_context: Input,
    decoder: FfmpegVideoDecoder,
    scaler: Option<ScalingContext>,
    stream_index: usize,
    time_base: Rational,
    start_pts: i64,
    metadata: VideoMetadata,
    /// Frame number that continues the current decode position without a
    /// seek. `None` after a seek failure or a decode error.
    next_frame_number: Option<u64>,
    end_of_stream: bool,
    path: PathBuf,
}

impl Debug for FfmpegDecoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FfmpegDecoder")
            .field("path", &self.path)
            .field("stream_index", &self.stream_index)
            .field("metadata", &self.metadata)
            .field("next_frame_number", &self.next_frame_number)
            .finish_non_exhaustive()
    }
}

impl VideoDecoder for FfmpegDecoder {
    fn open(path: &Path) -> Result<Self, StillframeError> {
        let path_buf = path.to_path_buf();
        let open_error = |reason: String| StillframeError::FileOpen {
            path: path_buf.clone(),
            reason,
        };

        log::debug!("Opening video file: {}", path.display());

        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| open_error(error.to_string()))?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(StillframeError::NoVideoStream)?;
        let stream_index = stream.index();
        let time_base = stream.time_base();
        // i64::MIN is AV_NOPTS_VALUE.
        let start_pts = match stream.start_time() {
            i64::MIN => 0,
            start => start,
        };

        let decoder_context = CodecContext::from_parameters(stream.parameters()).map_err(|error| {
            open_error(format!(
                "Failed to read video codec parameters for stream {stream_index}: {error}"
            ))
        })?;
        let decoder = decoder_context.decoder().video().map_err(|error| {
            open_error(format!(
                "Failed to create video decoder for stream {stream_index}: {error}"
            ))
        })?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(StillframeError::InvalidDimensions { width, height });
        }

        // Prefer the average frame rate; fall back to the stream's rate field.
        let frames_per_second = [stream.avg_frame_rate(), stream.rate()]
            .into_iter()
            .find(|rate| rate.numerator() > 0 && rate.denominator() > 0)
            .map(|rate| rate.numerator() as f64 / rate.denominator() as f64)
            .unwrap_or(0.0);
        if frames_per_second <= 0.0 {
            return Err(StillframeError::InvalidFrameRate(frames_per_second));
        }

        let duration = if stream.duration() > 0 {
            Duration::from_secs_f64(conversion::pts_to_seconds(stream.duration(), time_base))
        } else if input_context.duration() > 0 {
            Duration::from_micros(input_context.duration() as u64)
        } else {
            Duration::ZERO
        };

        let frame_count = if stream.frames() > 0 {
            stream.frames() as u64
        } else {
            (duration.as_secs_f64() * frames_per_second) as u64
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let format = input_context.format().name().to_string();

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_count,
            duration,
            codec,
            format,
        };

        log::debug!(
            "Video stream: index={stream_index}, {width}x{height}, {frames_per_second:.2} fps, codec={}, {frame_count} frames",
            metadata.codec,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler: None,
            stream_index,
            time_base,
            start_pts,
            metadata,
            next_frame_number: None,
            end_of_stream: false,
            path: path_buf,
        })
    }

    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn decode_frame(&mut self, frame_number: u64) -> Result<RgbImage, StillframeError> {
        let continuing = self.next_frame_number == Some(frame_number);
        if !continuing {
            self.seek(frame_number)?;
        }

        let previous_number = if continuing {
            frame_number.checked_sub(1)
        } else {
            None
        };
        match self.decode_forward_to(frame_number, previous_number) {
            Ok((image, decoded_number)) => {
                // A frame past the target means the stream has a gap here; the
                // decoder is no longer positioned right after `frame_number`.
                self.next_frame_number =
                    (decoded_number == frame_number).then_some(frame_number + 1);
                Ok(image)
            }
            Err(error) => {
                self.next_frame_number = None;
                Err(error)
            }
        }
    }
}

impl FfmpegDecoder {
    /// Path this decoder was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seek the demuxer to the keyframe at or before `frame_number` and drop
    /// anything buffered in the decoder.
    fn seek(&mut self, frame_number: u64) -> Result<(), StillframeError> {
        self.next_frame_number = None;
        let timestamp = conversion::frame_number_to_seek_timestamp(
            frame_number,
            self.metadata.frames_per_second,
        );
        log::debug!("Seeking to frame {frame_number} (timestamp {timestamp}us)");

        self.input_context.seek(timestamp, ..timestamp)?;
        self.decoder.flush();
        self.end_of_stream = false;
        Ok(())
    }

    /// Decode until a frame at or past `target` comes out of the decoder.
    ///
    /// Returns the image with the frame number its timestamp maps to.
    /// `previous_number` numbers frames that carry no timestamp.
    fn decode_forward_to(
        &mut self,
        target: u64,
        mut previous_number: Option<u64>,
    ) -> Result<(RgbImage, u64), StillframeError> {
        let mut decoded_frame = VideoFrame::empty();

        loop {
            while self.decoder.receive_frame(&mut decoded_frame).is_ok() {
                let current_number = match decoded_frame.timestamp().or(decoded_frame.pts()) {
                    Some(pts) => conversion::pts_to_frame_number(
                        pts - self.start_pts,
                        self.time_base,
                        self.metadata.frames_per_second,
                    ),
                    None => previous_number.map_or(0, |number| number + 1),
                };
                previous_number = Some(current_number);

                if current_number >= target {
                    if current_number > target {
                        log::debug!(
                            "Frame {target} not present in stream, using frame {current_number}"
                        );
                    }
                    let image = self.convert_frame(&decoded_frame)?;
                    return Ok((image, current_number));
                }
            }

            if self.end_of_stream {
                break;
            }

            match self.next_video_packet() {
                Some(packet) => self.decoder.send_packet(&packet)?,
                None => {
                    self.decoder.send_eof()?;
                    self.end_of_stream = true;
                }
            }
        }

        Err(StillframeError::VideoDecodeError(format!(
            "Could not locate frame {target} in the video stream"
        )))
    }

    fn next_video_packet(&mut self) -> Option<Packet> {
        let stream_index = self.stream_index;
        self.input_context
            .packets()
            .find(|(stream, _)| stream.index() == stream_index)
            .map(|(_, packet)| packet)
    }

    /// Convert a decoded frame to a tightly packed RGB8 raster.
    fn convert_frame(&mut self, decoded_frame: &VideoFrame) -> Result<RgbImage, StillframeError> {
        let width = self.metadata.width;
        let height = self.metadata.height;

        let needs_scaler = self.scaler.as_ref().is_none_or(|scaler| {
            let input = scaler.input();
            input.format != decoded_frame.format()
                || input.width != decoded_frame.width()
                || input.height != decoded_frame.height()
        });
        if needs_scaler {
            self.scaler = Some(ScalingContext::get(
                decoded_frame.format(),
                decoded_frame.width(),
                decoded_frame.height(),
                Pixel::RGB24,
                width,
                height,
                ScalingFlags::BILINEAR,
            )?);
        }

        let mut rgb_frame = VideoFrame::empty();
        if let Some(scaler) = self.scaler.as_mut() {
            scaler.run(decoded_frame, &mut rgb_frame)?;
        }

        let buffer = conversion::frame_to_buffer(&rgb_frame, width, height, 3);
        RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            StillframeError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })
    }
}
