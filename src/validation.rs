//! Video validation.
//!
//! [`validate_metadata`] inspects [`VideoMetadata`] and returns a
//! [`ValidationReport`] describing anything that would make frame addressing
//! unreliable or impossible.
//!
//! # Example
//!
//! ```no_run
//! use stillframe::FrameGrabber;
//!
//! let grabber = FrameGrabber::open("input.mp4")?;
//! if let Some(report) = grabber.validate() {
//!     print!("{report}");
//! }
//! # Ok::<(), stillframe::StillframeError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::metadata::VideoMetadata;

/// Above this frame rate playback cannot keep up with the tick interval.
const HIGH_FRAME_RATE: f64 = 240.0;

/// Tolerance, in frames, between the reported frame count and the count
/// implied by duration and frame rate.
const FRAME_COUNT_TOLERANCE: f64 = 2.0;

/// Summary of video validation.
///
/// Contains informational notices, warnings, and errors.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Issues that may make seeking imprecise.
    pub warnings: Vec<String>,
    /// Issues that prevent frame addressing.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of entries (info + warnings + errors).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Run validation checks on video metadata.
pub fn validate_metadata(metadata: &VideoMetadata) -> ValidationReport {
    let mut report = ValidationReport::default();

    // ── Geometry ───────────────────────────────────────────────────
    if metadata.width == 0 || metadata.height == 0 {
        report.errors.push(format!(
            "Invalid video dimensions: {}x{}",
            metadata.width, metadata.height,
        ));
    }

    // ── Timing ─────────────────────────────────────────────────────
    if metadata.frames_per_second <= 0.0 || !metadata.frames_per_second.is_finite() {
        report.errors.push(format!(
            "Frame rate {} fps cannot address frames by time",
            metadata.frames_per_second,
        ));
    } else if metadata.frames_per_second > HIGH_FRAME_RATE {
        report.warnings.push(format!(
            "Unusually high frame rate ({:.1} fps); playback will skip ahead slower than real time",
            metadata.frames_per_second,
        ));
    }

    if metadata.frame_count == 0 {
        report.errors.push("Video contains no frames".to_string());
    }

    if metadata.duration == Duration::ZERO {
        report
            .warnings
            .push("Duration is unknown; frame count may be estimated".to_string());
    } else if metadata.frames_per_second > 0.0 && metadata.frame_count > 0 {
        let implied = metadata.duration.as_secs_f64() * metadata.frames_per_second;
        if (implied - metadata.frame_count as f64).abs() > FRAME_COUNT_TOLERANCE {
            report.warnings.push(format!(
                "Frame count {} differs from the {implied:.0} implied by duration; the frame rate may be variable",
                metadata.frame_count,
            ));
        }
    }

    report.info.push(format!(
        "Video: {} in {}, {}x{} @ {:.2} fps, {} frames",
        metadata.codec,
        metadata.format,
        metadata.width,
        metadata.height,
        metadata.frames_per_second,
        metadata.frame_count,
    ));

    report
}
