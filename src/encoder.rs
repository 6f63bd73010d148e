//! Image encoding.
//!
//! [`ImageEncoder`] writes a raster to disk in a given [`ImageFormat`].
//! [`ImageFileEncoder`] is the implementation built on the
//! [`image`](https://crates.io/crates/image) crate.

use std::{fs, io::Cursor, path::Path};

use image::{DynamicImage, codecs::jpeg::JpegEncoder};

use crate::{error::StillframeError, files, format::ImageFormat};

/// Default JPEG quality used by [`ImageFileEncoder::new`].
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Writes images to files.
pub trait ImageEncoder {
    /// Encode `image` as `format` and write it to `path`, creating missing
    /// parent directories once encoding has succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created, the image cannot
    /// be encoded in `format`, or the file cannot be written.
    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        path: &Path,
    ) -> Result<(), StillframeError>;
}

/// [`ImageEncoder`] backed by the `image` crate.
///
/// The whole file is encoded in memory before anything is written, so an
/// encoding failure never leaves a truncated file behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFileEncoder {
    jpeg_quality: u8,
}

impl Default for ImageFileEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFileEncoder {
    /// Create an encoder with [`DEFAULT_JPEG_QUALITY`].
    pub fn new() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the JPEG quality, clamped to `1..=100`.
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// The JPEG quality in use.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Encode `image` as `format` into a byte vector.
    ///
    /// # Errors
    ///
    /// Returns [`StillframeError::ImageError`] if the format cannot represent
    /// the image.
    pub fn encode_to_vec(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
    ) -> Result<Vec<u8>, StillframeError> {
        let mut bytes = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut bytes, self.jpeg_quality);
                image.to_rgb8().write_with_encoder(encoder)?;
            }
            _ => {
                image.write_to(&mut Cursor::new(&mut bytes), format.to_image_format())?;
            }
        }
        Ok(bytes)
    }
}

impl ImageEncoder for ImageFileEncoder {
    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        path: &Path,
    ) -> Result<(), StillframeError> {
        let bytes = self.encode_to_vec(image, format)?;
        files::ensure_parent_directory(path)?;
        fs::write(path, &bytes)?;

        log::debug!(
            "Wrote {} bytes of {format} to {}",
            bytes.len(),
            path.display()
        );
        Ok(())
    }
}
