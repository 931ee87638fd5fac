//! # pagesense-diff
//!
//! Localizes a pixel diff into named page regions and derives a comparison
//! verdict.
//!
//! The pixel comparison itself happens elsewhere; this crate consumes the RGBA
//! diff buffer it produces, where changed pixels are painted [`DIFF_COLOR`].
//! Mismatched capture dimensions are a hard error, never a verdict.

pub mod bitmap;
pub mod comparison;
pub mod region;

pub use bitmap::{diff_mask, DiffBitmap, Dimensions, DIFF_COLOR};
pub use comparison::{
    analyze_comparison, analyze_with_config, determine_comparison_verdict, ComparisonAnalysis,
    ComparisonVerdict, PixelDiffResult,
};
pub use pagesense_core::{PageSenseError, Result};
pub use region::{
    analyze_bitmap, analyze_regions, ChangedRegion, PixelBounds, RegionLocation, RegionSeverity,
};
