//! Diff bitmap validation and pixel access

use pagesense_core::{PageSenseError, Result};
use serde::{Deserialize, Serialize};

use crate::region::PixelBounds;

/// RGB triplet the pixel comparator paints on changed pixels
pub const DIFF_COLOR: [u8; 3] = [255, 0, 0];

/// RGBA
pub const BYTES_PER_PIXEL: usize = 4;

/// Width and height of a capture in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Baseline and current captures must have identical dimensions
    pub fn ensure_matches(&self, other: &Dimensions) -> Result<()> {
        if self != other {
            return Err(PageSenseError::dimension_mismatch(
                (self.width, self.height),
                (other.width, other.height),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Validated view over an RGBA diff buffer
#[derive(Debug, Clone, Copy)]
pub struct DiffBitmap<'a> {
    dimensions: Dimensions,
    data: &'a [u8],
}

impl<'a> DiffBitmap<'a> {
    /// Wrap a buffer, rejecting empty images and length mismatches
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        let dimensions = Dimensions::new(width, height);
        if dimensions.pixel_count() == 0 {
            return Err(PageSenseError::InvalidBitmap(format!(
                "bitmap has no pixels ({})",
                dimensions
            )));
        }

        let expected = usize::try_from(dimensions.pixel_count())
            .ok()
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| {
                PageSenseError::InvalidBitmap(format!("bitmap too large ({})", dimensions))
            })?;

        if data.len() != expected {
            return Err(PageSenseError::InvalidBitmap(format!(
                "expected {} bytes for {} RGBA, got {}",
                expected,
                dimensions,
                data.len()
            )));
        }

        Ok(Self { dimensions, data })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    /// Whether the pixel at (x, y) carries the diff color
    pub fn is_changed(&self, x: u32, y: u32) -> bool {
        let offset = (y as usize * self.dimensions.width as usize + x as usize) * BYTES_PER_PIXEL;
        self.data[offset..offset + 3] == DIFF_COLOR
    }

    /// Changed pixels inside `bounds`, clipped to the bitmap
    pub fn count_changed(&self, bounds: &PixelBounds) -> u64 {
        let x_end = bounds.x.saturating_add(bounds.width).min(self.width());
        let y_end = bounds.y.saturating_add(bounds.height).min(self.height());
        let row_bytes = self.width() as usize * BYTES_PER_PIXEL;

        let mut changed = 0;
        for y in bounds.y..y_end {
            let start = y as usize * row_bytes + bounds.x as usize * BYTES_PER_PIXEL;
            let end = y as usize * row_bytes + x_end as usize * BYTES_PER_PIXEL;
            if start >= end {
                continue;
            }
            changed += self.data[start..end]
                .chunks_exact(BYTES_PER_PIXEL)
                .filter(|px| px[..3] == DIFF_COLOR)
                .count() as u64;
        }
        changed
    }

    pub fn total_changed(&self) -> u64 {
        self.count_changed(&PixelBounds::full(self.dimensions))
    }
}

/// Render an RGBA diff buffer from a predicate, painting changed pixels
///
/// Unchanged pixels are left transparent black.
pub fn diff_mask(width: u32, height: u32, changed: impl Fn(u32, u32) -> bool) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
    for y in 0..height {
        for x in 0..width {
            if changed(x, y) {
                data.extend_from_slice(&[DIFF_COLOR[0], DIFF_COLOR[1], DIFF_COLOR[2], 255]);
            } else {
                data.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_length() {
        let data = vec![0u8; 10 * 10 * 4 - 1];
        let err = DiffBitmap::new(&data, 10, 10).unwrap_err();
        assert!(matches!(err, PageSenseError::InvalidBitmap(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_rejects_empty_image() {
        assert!(DiffBitmap::new(&[], 0, 10).is_err());
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let baseline = Dimensions::new(1280, 800);
        let current = Dimensions::new(1280, 720);
        let err = baseline.ensure_matches(&current).unwrap_err();
        assert!(matches!(err, PageSenseError::DimensionMismatch { .. }));
        assert!(baseline.ensure_matches(&Dimensions::new(1280, 800)).is_ok());
    }

    #[test]
    fn test_only_exact_diff_color_counts() {
        let mut data = diff_mask(2, 1, |x, _| x == 0);
        // Near-red is not the sentinel
        data[4..8].copy_from_slice(&[254, 0, 0, 255]);
        let bitmap = DiffBitmap::new(&data, 2, 1).unwrap();
        assert!(bitmap.is_changed(0, 0));
        assert!(!bitmap.is_changed(1, 0));
        assert_eq!(bitmap.total_changed(), 1);
    }

    #[test]
    fn test_alpha_is_ignored() {
        let data = vec![255, 0, 0, 0];
        let bitmap = DiffBitmap::new(&data, 1, 1).unwrap();
        assert!(bitmap.is_changed(0, 0));
    }

    #[test]
    fn test_count_changed_clips_bounds() {
        let data = diff_mask(4, 4, |_, _| true);
        let bitmap = DiffBitmap::new(&data, 4, 4).unwrap();
        let bounds = PixelBounds { x: 2, y: 2, width: 10, height: 10 };
        assert_eq!(bitmap.count_changed(&bounds), 4);
    }
}
