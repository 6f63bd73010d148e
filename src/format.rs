//! Supported image output formats and accepted video extensions.
//!
//! [`ImageFormat`] maps exactly between format and file extension:
//!
//! | Format | Extensions |
//! |--------|------------|
//! | JPEG   | `jpg`, `jpeg` |
//! | PNG    | `png` |
//! | BMP    | `bmp` |
//! | TIFF   | `tiff`, `tif` |
//! | WEBP   | `webp` |

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::Path,
    str::FromStr,
};

use crate::error::StillframeError;

/// Video file extensions accepted as "plausibly a video" when filtering
/// files. Whether a file actually decodes is decided by opening it.
pub const VIDEO_EXTENSIONS: [&str; 12] = [
    "mp4", "avi", "mov", "mkv", "wmv", "flv", "webm", "m4v", "3gp", "ogv", "ts", "mts",
];

/// Encoded image format for exported frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// JPEG (lossy). This is the default.
    #[default]
    Jpeg,
    /// PNG (lossless).
    Png,
    /// Windows bitmap.
    Bmp,
    /// TIFF.
    Tiff,
    /// WebP (lossless encoding).
    Webp,
}

impl ImageFormat {
    /// All supported formats, in the order they are offered to users.
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::Bmp,
        ImageFormat::Tiff,
        ImageFormat::Webp,
    ];

    /// Every file extension (lowercase, without dot) mapped to this format.
    /// The first entry is the one used when generating file names.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Jpeg => &["jpg", "jpeg"],
            ImageFormat::Png => &["png"],
            ImageFormat::Bmp => &["bmp"],
            ImageFormat::Tiff => &["tiff", "tif"],
            ImageFormat::Webp => &["webp"],
        }
    }

    /// The extension used when generating file names.
    pub fn primary_extension(self) -> &'static str {
        self.extensions()[0]
    }

    /// Upper-case display name (`"JPEG"`, `"PNG"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Webp => "WEBP",
        }
    }

    /// Format for a bare extension (with or without leading dot), ignoring
    /// ASCII case.
    pub fn from_extension(extension: &str) -> Option<ImageFormat> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        ImageFormat::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
    }

    /// Format implied by the extension of `path`, if any.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<ImageFormat> {
        path.as_ref()
            .extension()
            .and_then(|extension| extension.to_str())
            .and_then(ImageFormat::from_extension)
    }

    /// Map to the corresponding `image` crate format.
    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Webp => image::ImageFormat::WebP,
        }
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for ImageFormat {
    type Err = StillframeError;

    /// Parse a format name (`"jpeg"`, `"PNG"`) or extension (`"jpg"`, `".tif"`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        ImageFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(trimmed))
            .or_else(|| ImageFormat::from_extension(trimmed))
            .ok_or_else(|| StillframeError::UnsupportedImageFormat(trimmed.to_string()))
    }
}
