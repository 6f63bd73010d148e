//! Shared helpers for integration tests that do not need FFmpeg fixtures.

#![allow(dead_code)]

use std::{
    collections::HashSet,
    path::Path,
    time::Duration,
};

use image::{Rgb, RgbImage};
use stillframe::{FrameGrabber, StillframeError, VideoDecoder, VideoMetadata};

pub fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

pub fn metadata(width: u32, height: u32, frames_per_second: f64, frame_count: u64) -> VideoMetadata {
    let duration = if frames_per_second > 0.0 {
        Duration::from_secs_f64(frame_count as f64 / frames_per_second)
    } else {
        Duration::ZERO
    };
    VideoMetadata {
        width,
        height,
        frames_per_second,
        frame_count,
        duration,
        codec: "scripted".to_string(),
        format: "memory".to_string(),
    }
}

/// Pixel colour used for every pixel of frame `index`.
pub fn frame_colour(index: u64) -> Rgb<u8> {
    Rgb([(index % 256) as u8, ((index / 256) % 256) as u8, 200])
}

/// In-memory decoder that produces solid-colour frames and can be told to
/// fail on chosen indices.
#[derive(Debug, Clone)]
pub struct ScriptedDecoder {
    metadata: VideoMetadata,
    failing: HashSet<u64>,
    pub decoded: Vec<u64>,
}

impl ScriptedDecoder {
    pub fn new(metadata: VideoMetadata) -> Self {
        Self {
            metadata,
            failing: HashSet::new(),
            decoded: Vec::new(),
        }
    }

    /// 16x9 pixels at 30 fps.
    pub fn with_frames(frame_count: u64) -> Self {
        Self::new(metadata(16, 9, 30.0, frame_count))
    }

    pub fn failing_on(mut self, frames: &[u64]) -> Self {
        self.failing.extend(frames.iter().copied());
        self
    }
}

impl VideoDecoder for ScriptedDecoder {
    fn open(path: &Path) -> Result<Self, StillframeError> {
        Err(StillframeError::FileOpen {
            path: path.to_path_buf(),
            reason: "scripted decoder has no files".to_string(),
        })
    }

    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn decode_frame(&mut self, frame_number: u64) -> Result<RgbImage, StillframeError> {
        if self.failing.contains(&frame_number) {
            return Err(StillframeError::VideoDecodeError(format!(
                "scripted failure at frame {frame_number}"
            )));
        }
        self.decoded.push(frame_number);
        Ok(RgbImage::from_pixel(
            self.metadata.width,
            self.metadata.height,
            frame_colour(frame_number),
        ))
    }
}

pub fn grabber_with_frames(frame_count: u64) -> FrameGrabber<ScriptedDecoder> {
    FrameGrabber::with_decoder(ScriptedDecoder::with_frames(frame_count))
        .expect("Failed to load scripted decoder")
}
