//! The decoded raster for the current frame index.

use image::{DynamicImage, RgbImage};

use crate::resize::Size;

/// A decoded video frame together with the index it was decoded from.
///
/// Pixels are interleaved RGB, 8 bits per channel, row-major. A
/// `DecodedFrame` handed out by [`FrameGrabber::current_frame`](crate::FrameGrabber::current_frame)
/// is an independent copy: later seeks never change it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    index: u64,
    image: RgbImage,
}

impl DecodedFrame {
    /// Pair a raster with the frame index it belongs to.
    pub fn new(index: u64, image: RgbImage) -> Self {
        Self { index, image }
    }

    /// Zero-based frame index.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Native size of the raster.
    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    /// Tightly packed RGB bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Borrow the raster.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Consume the frame, returning the raster as a [`DynamicImage`].
    pub fn into_image(self) -> DynamicImage {
        DynamicImage::ImageRgb8(self.image)
    }
}
