//! Video metadata types.
//!
//! [`VideoMetadata`] is produced once when a video is opened and stays
//! fixed for as long as that video is loaded in a
//! [`FrameGrabber`](crate::FrameGrabber).

use std::time::Duration;

use crate::resize::Size;

/// Metadata for an open video stream.
///
/// # Example
///
/// ```no_run
/// use stillframe::FrameGrabber;
///
/// let grabber = FrameGrabber::open("input.mp4").unwrap();
/// let metadata = grabber.metadata().unwrap();
/// println!("{}x{} @ {:.2} fps", metadata.width, metadata.height, metadata.frames_per_second);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second. A malformed source may report 0.
    pub frames_per_second: f64,
    /// Total number of frames.
    pub frame_count: u64,
    /// Total duration of the stream.
    pub duration: Duration,
    /// Codec name (e.g. `"h264"`, `"vp9"`, `"av1"`).
    pub codec: String,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`, `"matroska,webm"`).
    pub format: String,
}

impl VideoMetadata {
    /// Native frame size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Index of the last frame, or `None` for an empty video.
    pub fn last_frame(&self) -> Option<u64> {
        self.frame_count.checked_sub(1)
    }
}
