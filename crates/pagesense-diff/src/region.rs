//! Named-region analysis of a diff bitmap
//!
//! The page is split into four fixed rectangles (header, navigation, content,
//! footer). Each region's changed percentage is relative to the region's own
//! pixel count, never the whole image.

use pagesense_core::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitmap::{DiffBitmap, Dimensions};

/// Regions at or below this changed percentage are noise
pub const NOISE_FLOOR_PERCENT: f64 = 0.1;

/// Above this a region change is unexpected
pub const UNEXPECTED_PERCENT: f64 = 10.0;

/// Above this a region change is critical
pub const CRITICAL_PERCENT: f64 = 30.0;

/// Where a region sits on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionLocation {
    Top,
    Bottom,
    Left,
    Right,
    Center,
    Full,
}

impl std::fmt::Display for RegionLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Center => write!(f, "center"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// How alarming a region change is. Declared most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionSeverity {
    Critical,
    Unexpected,
    Expected,
}

impl RegionSeverity {
    /// Tier for a region's changed percentage
    pub fn for_percent(percent: f64) -> Self {
        if percent > CRITICAL_PERCENT {
            Self::Critical
        } else if percent > UNEXPECTED_PERCENT {
            Self::Unexpected
        } else {
            Self::Expected
        }
    }
}

impl std::fmt::Display for RegionSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Unexpected => write!(f, "unexpected"),
            Self::Expected => write!(f, "expected"),
        }
    }
}

/// Pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBounds {
    pub fn full(dimensions: Dimensions) -> Self {
        Self {
            x: 0,
            y: 0,
            width: dimensions.width,
            height: dimensions.height,
        }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// A region whose content changed beyond the noise floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedRegion {
    pub name: String,
    pub location: RegionLocation,
    pub bounds: PixelBounds,
    /// Changed pixels as a percentage of this region's pixels
    pub changed_percent: f64,
    pub severity: RegionSeverity,
}

/// A fixed named rectangle of the page layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRegion {
    pub name: &'static str,
    pub location: RegionLocation,
    pub bounds: PixelBounds,
}

/// The four named regions for an image of the given size
///
/// Header is the top 10%, footer the bottom 10%. The band between them is
/// split into navigation (left 20%) and content (the rest).
pub fn layout_regions(dimensions: Dimensions) -> Vec<LayoutRegion> {
    let Dimensions { width, height } = dimensions;
    let header_height = height / 10;
    let footer_height = height / 10;
    let band_y = header_height;
    let band_height = height - header_height - footer_height;
    let nav_width = width / 5;

    vec![
        LayoutRegion {
            name: "header",
            location: RegionLocation::Top,
            bounds: PixelBounds { x: 0, y: 0, width, height: header_height },
        },
        LayoutRegion {
            name: "navigation",
            location: RegionLocation::Left,
            bounds: PixelBounds { x: 0, y: band_y, width: nav_width, height: band_height },
        },
        LayoutRegion {
            name: "content",
            location: RegionLocation::Center,
            bounds: PixelBounds {
                x: nav_width,
                y: band_y,
                width: width - nav_width,
                height: band_height,
            },
        },
        LayoutRegion {
            name: "footer",
            location: RegionLocation::Bottom,
            bounds: PixelBounds {
                x: 0,
                y: height - footer_height,
                width,
                height: footer_height,
            },
        },
    ]
}

/// Analyze a raw RGBA diff buffer
pub fn analyze_regions(data: &[u8], width: u32, height: u32) -> Result<Vec<ChangedRegion>> {
    let bitmap = DiffBitmap::new(data, width, height)?;
    Ok(analyze_bitmap(&bitmap))
}

/// Changed regions of a validated bitmap, most severe first
pub fn analyze_bitmap(bitmap: &DiffBitmap<'_>) -> Vec<ChangedRegion> {
    let mut regions: Vec<ChangedRegion> = layout_regions(bitmap.dimensions())
        .into_iter()
        .filter(|area| area.bounds.pixel_count() > 0)
        .filter_map(|area| {
            let changed = bitmap.count_changed(&area.bounds);
            let percent = changed as f64 * 100.0 / area.bounds.pixel_count() as f64;
            debug!("Region {} changed {:.2}%", area.name, percent);

            (percent > NOISE_FLOOR_PERCENT).then(|| ChangedRegion {
                name: area.name.to_string(),
                location: area.location,
                bounds: area.bounds,
                changed_percent: percent,
                severity: RegionSeverity::for_percent(percent),
            })
        })
        .collect();

    sort_regions(&mut regions);
    regions
}

/// Severity rank first, then descending percentage
pub fn sort_regions(regions: &mut [ChangedRegion]) {
    regions.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| b.changed_percent.total_cmp(&a.changed_percent))
    });
}
