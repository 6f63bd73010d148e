//! Export requests.
//!
//! An [`ExportRequest`] describes one export of the current frame: where to
//! write it, in which format, and at what size. Requests are built with the
//! same builder style as the rest of the crate and are consumed by
//! [`FrameGrabber::export_current_frame`](crate::FrameGrabber::export_current_frame).
//!
//! # Example
//!
//! ```no_run
//! use stillframe::{ExportRequest, FrameGrabber, ImageFormat};
//!
//! let mut grabber = FrameGrabber::open("input.mp4")?;
//! grabber.seek_to_frame(120)?;
//!
//! let request = ExportRequest::new("stills/frame.png")
//!     .with_format(ImageFormat::Png)
//!     .with_width(640);
//! grabber.export_current_frame(&request)?;
//! # Ok::<(), stillframe::StillframeError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::{
    encoder::DEFAULT_JPEG_QUALITY,
    error::StillframeError,
    format::ImageFormat,
    resize::{self, Size},
};

/// Requested output size for an exported frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSize {
    /// Keep the frame's native size. This is the default.
    #[default]
    Original,
    /// A custom size. A missing dimension is derived from the other one
    /// using the source proportion.
    Custom {
        /// Target width, if constrained.
        width: Option<u32>,
        /// Target height, if constrained.
        height: Option<u32>,
        /// When both dimensions are given, treat them as a bounding box and
        /// keep the source proportion instead of stretching.
        keep_aspect_ratio: bool,
    },
}

impl OutputSize {
    /// Exactly `size`, stretching if the proportion differs.
    pub fn exact(size: Size) -> Self {
        OutputSize::Custom {
            width: Some(size.width),
            height: Some(size.height),
            keep_aspect_ratio: false,
        }
    }

    /// The largest size with the source proportion that fits in `bounds`.
    pub fn fit(bounds: Size) -> Self {
        OutputSize::Custom {
            width: Some(bounds.width),
            height: Some(bounds.height),
            keep_aspect_ratio: true,
        }
    }

    /// Resolve against the frame's native size.
    ///
    /// # Errors
    ///
    /// Returns [`StillframeError::InvalidDimensions`] if `native` or the
    /// resolved size has a zero dimension.
    pub fn resolve(self, native: Size) -> Result<Size, StillframeError> {
        native.ensure_non_empty()?;

        let resolved = match self {
            OutputSize::Original => native,
            OutputSize::Custom {
                width: Some(width),
                height: Some(height),
                keep_aspect_ratio: true,
            } => resize::fit_within(native, Size::new(width, height))?,
            OutputSize::Custom { width, height, .. } => {
                resize::aspect_ratio_size(native, width, height)?
            }
        };

        resolved.ensure_non_empty()?;
        Ok(resolved)
    }
}

/// A single export of the current frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ExportRequest {
    /// Destination file.
    pub output_path: PathBuf,
    /// Explicit output format. `None` infers it from the path's extension.
    pub format: Option<ImageFormat>,
    /// Output size.
    pub size: OutputSize,
    /// JPEG quality (1-100). Ignored for other formats.
    pub jpeg_quality: u8,
}

impl ExportRequest {
    /// Export to `output_path` at native size, format from the extension.
    pub fn new<P: Into<PathBuf>>(output_path: P) -> Self {
        Self {
            output_path: output_path.into(),
            format: None,
            size: OutputSize::Original,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Encode as `format`. If the path's extension names an image format,
    /// it must be the same one.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the complete output size.
    pub fn with_size(mut self, size: OutputSize) -> Self {
        self.size = size;
        self
    }

    /// Constrain the width, keeping any height already set.
    pub fn with_width(mut self, width: u32) -> Self {
        self.size = match self.size {
            OutputSize::Original => OutputSize::Custom {
                width: Some(width),
                height: None,
                keep_aspect_ratio: true,
            },
            OutputSize::Custom {
                height,
                keep_aspect_ratio,
                ..
            } => OutputSize::Custom {
                width: Some(width),
                height,
                keep_aspect_ratio,
            },
        };
        self
    }

    /// Constrain the height, keeping any width already set.
    pub fn with_height(mut self, height: u32) -> Self {
        self.size = match self.size {
            OutputSize::Original => OutputSize::Custom {
                width: None,
                height: Some(height),
                keep_aspect_ratio: true,
            },
            OutputSize::Custom {
                width,
                keep_aspect_ratio,
                ..
            } => OutputSize::Custom {
                width,
                height: Some(height),
                keep_aspect_ratio,
            },
        };
        self
    }

    /// Control whether a width and height given together act as a bounding
    /// box (`true`) or an exact size (`false`). No effect on
    /// [`OutputSize::Original`].
    pub fn with_keep_aspect_ratio(mut self, keep: bool) -> Self {
        if let OutputSize::Custom {
            keep_aspect_ratio, ..
        } = &mut self.size
        {
            *keep_aspect_ratio = keep;
        }
        self
    }

    /// Set the JPEG quality, clamped to `1..=100`.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Work out the output format and final path.
    ///
    /// The explicit format wins over an unknown extension; otherwise the
    /// extension decides. A path without an extension gets the format's
    /// primary extension appended.
    ///
    /// # Errors
    ///
    /// Returns [`StillframeError::UnsupportedImageFormat`] if no format is
    /// set and the extension is not a supported image extension, or if the
    /// explicit format contradicts a known image extension (`.png` requested
    /// as JPEG).
    pub fn resolve_target(&self) -> Result<(ImageFormat, PathBuf), StillframeError> {
        let extension = self
            .output_path
            .extension()
            .map(|extension| extension.to_string_lossy().into_owned());
        let implied = extension.as_deref().and_then(ImageFormat::from_extension);

        let format = match (self.format, implied, extension.as_deref()) {
            (Some(format), Some(implied), Some(extension)) if format != implied => {
                return Err(StillframeError::UnsupportedImageFormat(format!(
                    "{format} cannot be written to a .{extension} file"
                )));
            }
            (Some(format), _, _) => format,
            (None, Some(implied), _) => implied,
            (None, None, Some(extension)) => {
                return Err(StillframeError::UnsupportedImageFormat(extension.to_string()));
            }
            (None, None, None) => ImageFormat::default(),
        };

        let path = if extension.is_some() {
            self.output_path.clone()
        } else {
            with_appended_extension(&self.output_path, format.primary_extension())
        };

        Ok((format, path))
    }
}

fn with_appended_extension(path: &Path, extension: &str) -> PathBuf {
    let mut file_name = path.as_os_str().to_owned();
    file_name.push(".");
    file_name.push(extension);
    PathBuf::from(file_name)
}
