//! Aspect-ratio aware size computation.
//!
//! Everything here is pure arithmetic over [`Size`] values: no decoder, no
//! file system. [`aspect_ratio_size`] derives one dimension from the other,
//! and [`fit_within`] picks which dimension drives when a caller wants the
//! result to stay inside a bounding box.
//!
//! # Example
//!
//! ```
//! use stillframe::{Size, aspect_ratio_size, fit_within};
//!
//! let original = Size::new(1920, 1080);
//! assert_eq!(aspect_ratio_size(original, Some(960), None)?, Size::new(960, 540));
//! assert_eq!(fit_within(Size::new(1000, 500), Size::new(400, 400))?, Size::new(400, 200));
//! # Ok::<(), stillframe::StillframeError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::StillframeError;

/// A raster size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a size from a width and a height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height.
    ///
    /// # Errors
    ///
    /// Returns [`StillframeError::InvalidDimensions`] if either dimension is
    /// zero, since such a size has no meaningful proportion.
    pub fn aspect_ratio(self) -> Result<f64, StillframeError> {
        self.ensure_non_empty()?;
        Ok(self.width as f64 / self.height as f64)
    }

    pub(crate) fn ensure_non_empty(self) -> Result<(), StillframeError> {
        if self.is_empty() {
            return Err(StillframeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Compute an output size from an original size and a partial target.
///
/// - Both dimensions given: returned verbatim. Aspect ratio is not enforced
///   here; a caller that wants it locked passes a single dimension (see
///   [`fit_within`]).
/// - Only `target_width`: height is `floor(target_width / ratio)`.
/// - Only `target_height`: width is `floor(target_height * ratio)`.
/// - Neither: `original` unchanged.
///
/// # Errors
///
/// Returns [`StillframeError::InvalidDimensions`] if `original` has a zero
/// dimension.
pub fn aspect_ratio_size(
    original: Size,
    target_width: Option<u32>,
    target_height: Option<u32>,
) -> Result<Size, StillframeError> {
    original.ensure_non_empty()?;

    // floor(w / (ow / oh)) computed exactly as (w * oh) / ow.
    let original_width = u64::from(original.width);
    let original_height = u64::from(original.height);

    let size = match (target_width, target_height) {
        (Some(width), Some(height)) => Size::new(width, height),
        (Some(width), None) => {
            let height = u64::from(width) * original_height / original_width;
            Size::new(width, saturate(height))
        }
        (None, Some(height)) => {
            let width = u64::from(height) * original_width / original_height;
            Size::new(saturate(width), height)
        }
        (None, None) => original,
    };
    Ok(size)
}

/// Scale `original` to the largest size with the same proportion that does
/// not exceed `bounds` in either dimension.
///
/// The dimension with the smaller scale factor drives: width when
/// `bounds.width / original.width` is smaller, height otherwise.
///
/// # Errors
///
/// Returns [`StillframeError::InvalidDimensions`] if `original` has a zero
/// dimension.
pub fn fit_within(original: Size, bounds: Size) -> Result<Size, StillframeError> {
    original.ensure_non_empty()?;

    // bw / ow < bh / oh, cross-multiplied.
    let width_scaled = u64::from(bounds.width) * u64::from(original.height);
    let height_scaled = u64::from(bounds.height) * u64::from(original.width);

    if width_scaled < height_scaled {
        aspect_ratio_size(original, Some(bounds.width), None)
    } else {
        aspect_ratio_size(original, None, Some(bounds.height))
    }
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Human-readable proportion of a size, e.g. `"16:9"` or `"1.91:1"`.
///
/// Common ratios are matched within a tolerance of 0.01; anything else is
/// printed as `"{ratio:.2}:1"`. A size with a zero dimension yields `"?"`.
pub fn aspect_ratio_label(size: Size) -> String {
    const KNOWN: [(f64, &str); 7] = [
        (16.0 / 9.0, "16:9"),
        (9.0 / 16.0, "9:16"),
        (4.0 / 3.0, "4:3"),
        (3.0 / 4.0, "3:4"),
        (1.0, "1:1"),
        (16.0 / 10.0, "16:10"),
        (10.0 / 16.0, "10:16"),
    ];

    let Ok(ratio) = size.aspect_ratio() else {
        return "?".to_string();
    };

    KNOWN
        .iter()
        .find(|(known, _)| (ratio - known).abs() < 0.01)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| format!("{ratio:.2}:1"))
}
