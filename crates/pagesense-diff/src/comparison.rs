//! Comparison verdicts from a pixel diff

use pagesense_core::config::ComparisonConfig;
use pagesense_core::{PageSenseError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bitmap::{DiffBitmap, Dimensions};
use crate::region::{analyze_bitmap, ChangedRegion, PixelBounds, RegionLocation, RegionSeverity};

/// Overall diff above this is unexpected even without flagged regions
pub const UNEXPECTED_OVERALL_PERCENT: f64 = 20.0;

/// Fallback region is `full` above this overall diff, `center` otherwise
pub const FULL_FALLBACK_PERCENT: f64 = 50.0;

/// Default caller threshold for an expected change
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 1.0;

/// Name of the region synthesized when no named region crossed the floor
pub const FALLBACK_REGION_NAME: &str = "overall";

/// Did the page change acceptably
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonVerdict {
    Match,
    ExpectedChange,
    UnexpectedChange,
    LayoutBroken,
}

impl ComparisonVerdict {
    /// Severity a synthesized fallback region carries under this verdict
    fn fallback_severity(&self) -> RegionSeverity {
        match self {
            Self::LayoutBroken => RegionSeverity::Critical,
            Self::UnexpectedChange => RegionSeverity::Unexpected,
            Self::Match | Self::ExpectedChange => RegionSeverity::Expected,
        }
    }
}

impl std::fmt::Display for ComparisonVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "MATCH"),
            Self::ExpectedChange => write!(f, "EXPECTED_CHANGE"),
            Self::UnexpectedChange => write!(f, "UNEXPECTED_CHANGE"),
            Self::LayoutBroken => write!(f, "LAYOUT_BROKEN"),
        }
    }
}

/// Output of the external pixel comparator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelDiffResult {
    /// Comparator's own match flag
    pub matches: bool,
    pub diff_pixels: u64,
    pub total_pixels: u64,
    pub diff_percent: f64,
    pub dimensions: Dimensions,
    /// RGBA diff buffer, when the comparator produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_data: Option<Vec<u8>>,
}

impl PixelDiffResult {
    /// Build from raw counts, refusing captures of different sizes
    pub fn new(
        baseline: Dimensions,
        current: Dimensions,
        diff_pixels: u64,
        diff_data: Option<Vec<u8>>,
    ) -> Result<Self> {
        baseline.ensure_matches(&current)?;
        let total_pixels = baseline.pixel_count();
        if diff_pixels > total_pixels {
            return Err(PageSenseError::InvalidBitmap(format!(
                "{} changed pixels exceed {} total",
                diff_pixels, total_pixels
            )));
        }
        let diff_percent = if total_pixels == 0 {
            0.0
        } else {
            diff_pixels as f64 * 100.0 / total_pixels as f64
        };

        Ok(Self {
            matches: diff_pixels == 0,
            diff_pixels,
            total_pixels,
            diff_percent,
            dimensions: baseline,
            diff_data,
        })
    }

    /// Build from a diff buffer by counting its sentinel pixels
    pub fn from_diff_data(dimensions: Dimensions, diff_data: Vec<u8>) -> Result<Self> {
        let changed = DiffBitmap::new(&diff_data, dimensions.width, dimensions.height)?
            .total_changed();
        Self::new(dimensions, dimensions, changed, Some(diff_data))
    }
}

/// Verdict plus the regions that explain it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonAnalysis {
    pub verdict: ComparisonVerdict,
    /// Most severe first; never empty unless the verdict is `Match`
    pub regions: Vec<ChangedRegion>,
    pub diff_percent: f64,
    pub summary: String,
}

impl ComparisonAnalysis {
    pub fn is_match(&self) -> bool {
        self.verdict == ComparisonVerdict::Match
    }
}

/// Verdict from the overall diff and the sorted region list
pub fn determine_comparison_verdict(
    diff_percent: f64,
    regions: &[ChangedRegion],
) -> ComparisonVerdict {
    let has = |severity| regions.iter().any(|r| r.severity == severity);

    if diff_percent == 0.0 {
        ComparisonVerdict::Match
    } else if has(RegionSeverity::Critical) {
        ComparisonVerdict::LayoutBroken
    } else if has(RegionSeverity::Unexpected) || diff_percent > UNEXPECTED_OVERALL_PERCENT {
        ComparisonVerdict::UnexpectedChange
    } else {
        ComparisonVerdict::ExpectedChange
    }
}

/// Analyze a pixel diff against a caller threshold (percent)
pub fn analyze_comparison(
    diff: &PixelDiffResult,
    threshold_percent: f64,
) -> Result<ComparisonAnalysis> {
    if !threshold_percent.is_finite() || threshold_percent < 0.0 {
        return Err(PageSenseError::Other(format!(
            "Invalid comparison threshold: {}",
            threshold_percent
        )));
    }
    if !diff.diff_percent.is_finite() || diff.diff_percent < 0.0 {
        return Err(PageSenseError::InvalidBitmap(format!(
            "Invalid diff percentage: {}",
            diff.diff_percent
        )));
    }

    let mut regions = match diff.diff_data.as_deref() {
        Some(data) => {
            let bitmap = DiffBitmap::new(data, diff.dimensions.width, diff.dimensions.height)?;
            analyze_bitmap(&bitmap)
        }
        None => Vec::new(),
    };

    let verdict = determine_comparison_verdict(diff.diff_percent, &regions);

    if regions.is_empty() && verdict != ComparisonVerdict::Match {
        let location = if diff.diff_percent > FULL_FALLBACK_PERCENT {
            RegionLocation::Full
        } else {
            RegionLocation::Center
        };
        debug!(
            "No named region above noise floor; synthesizing {} region",
            location
        );
        regions.push(ChangedRegion {
            name: FALLBACK_REGION_NAME.to_string(),
            location,
            bounds: PixelBounds::full(diff.dimensions),
            changed_percent: diff.diff_percent,
            severity: verdict.fallback_severity(),
        });
    }

    let summary = summarize(verdict, diff.diff_percent, threshold_percent, &regions);
    info!("Comparison verdict {}: {}", verdict, summary);

    Ok(ComparisonAnalysis {
        verdict,
        regions,
        diff_percent: diff.diff_percent,
        summary,
    })
}

/// [`analyze_comparison`] with the threshold from repository config
pub fn analyze_with_config(
    diff: &PixelDiffResult,
    config: &ComparisonConfig,
) -> Result<ComparisonAnalysis> {
    analyze_comparison(diff, config.threshold_percent)
}

fn summarize(
    verdict: ComparisonVerdict,
    diff_percent: f64,
    threshold_percent: f64,
    regions: &[ChangedRegion],
) -> String {
    let changed: Vec<String> = regions
        .iter()
        .map(|r| format!("{} {:.1}% ({})", r.name, r.changed_percent, r.severity))
        .collect();

    match verdict {
        ComparisonVerdict::Match => "No visual changes".to_string(),
        ComparisonVerdict::ExpectedChange if diff_percent <= threshold_percent => format!(
            "{:.2}% changed, within {:.2}% threshold: {}",
            diff_percent,
            threshold_percent,
            changed.join(", ")
        ),
        ComparisonVerdict::ExpectedChange => format!(
            "{:.2}% changed in minor regions: {}",
            diff_percent,
            changed.join(", ")
        ),
        ComparisonVerdict::UnexpectedChange => format!(
            "{:.2}% changed, unexpected changes in: {}",
            diff_percent,
            changed.join(", ")
        ),
        ComparisonVerdict::LayoutBroken => format!(
            "{:.2}% changed, layout broken in: {}",
            diff_percent,
            changed.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::diff_mask;

    fn without_data(diff_percent: f64) -> PixelDiffResult {
        PixelDiffResult {
            matches: false,
            diff_pixels: (diff_percent * 100.0) as u64,
            total_pixels: 10_000,
            diff_percent,
            dimensions: Dimensions::new(100, 100),
            diff_data: None,
        }
    }

    #[test]
    fn test_identical_images_match() {
        let diff = PixelDiffResult::from_diff_data(
            Dimensions::new(100, 100),
            diff_mask(100, 100, |_, _| false),
        )
        .unwrap();
        let analysis = analyze_comparison(&diff, DEFAULT_THRESHOLD_PERCENT).unwrap();
        assert!(analysis.is_match());
        assert!(analysis.regions.is_empty());
        assert_eq!(analysis.summary, "No visual changes");
    }

    #[test]
    fn test_fully_changed_content_is_layout_broken() {
        let data = diff_mask(100, 100, |x, y| x >= 20 && (10..90).contains(&y));
        let mut diff = without_data(64.0);
        diff.diff_data = Some(data);

        let analysis = analyze_comparison(&diff, DEFAULT_THRESHOLD_PERCENT).unwrap();
        assert_eq!(analysis.verdict, ComparisonVerdict::LayoutBroken);
        assert_eq!(analysis.regions[0].name, "content");
        assert_eq!(analysis.regions[0].severity, RegionSeverity::Critical);
    }

    #[test]
    fn test_small_diff_without_data_gets_center_fallback() {
        let analysis = analyze_comparison(&without_data(5.0), DEFAULT_THRESHOLD_PERCENT).unwrap();
        assert_eq!(analysis.verdict, ComparisonVerdict::ExpectedChange);
        assert_eq!(analysis.regions.len(), 1);
        assert_eq!(analysis.regions[0].name, FALLBACK_REGION_NAME);
        assert_eq!(analysis.regions[0].location, RegionLocation::Center);
        assert_eq!(analysis.regions[0].severity, RegionSeverity::Expected);
        assert_eq!(analysis.regions[0].changed_percent, 5.0);
    }

    #[test]
    fn test_large_diff_without_regions_is_unexpected_full() {
        let analysis = analyze_comparison(&without_data(64.0), DEFAULT_THRESHOLD_PERCENT).unwrap();
        assert_eq!(analysis.verdict, ComparisonVerdict::UnexpectedChange);
        assert_eq!(analysis.regions[0].location, RegionLocation::Full);
        assert_eq!(analysis.regions[0].severity, RegionSeverity::Unexpected);
    }

    #[test]
    fn test_overall_above_twenty_percent_is_unexpected() {
        assert_eq!(
            determine_comparison_verdict(20.5, &[]),
            ComparisonVerdict::UnexpectedChange
        );
        assert_eq!(
            determine_comparison_verdict(20.0, &[]),
            ComparisonVerdict::ExpectedChange
        );
    }

    #[test]
    fn test_unexpected_region_wins_over_small_overall() {
        // Footer rows 90..92 fully changed: 200 / 1000 = 20% of the footer
        let data = diff_mask(100, 100, |_, y| (90..92).contains(&y));
        let diff = PixelDiffResult::from_diff_data(Dimensions::new(100, 100), data).unwrap();
        assert_eq!(diff.diff_percent, 2.0);

        let analysis = analyze_comparison(&diff, DEFAULT_THRESHOLD_PERCENT).unwrap();
        assert_eq!(analysis.verdict, ComparisonVerdict::UnexpectedChange);
        assert_eq!(analysis.regions.len(), 1);
        assert_eq!(analysis.regions[0].name, "footer");
    }

    #[test]
    fn test_expected_change_within_threshold() {
        // 80 pixels: 1.25% of content, 0.8% overall
        let data = diff_mask(100, 100, |x, y| y == 50 && x >= 20);
        let diff = PixelDiffResult::from_diff_data(Dimensions::new(100, 100), data).unwrap();
        assert_eq!(diff.diff_percent, 0.8);

        let analysis = analyze_comparison(&diff, DEFAULT_THRESHOLD_PERCENT).unwrap();
        assert_eq!(analysis.verdict, ComparisonVerdict::ExpectedChange);
        assert_eq!(analysis.regions[0].name, "content");
        assert!(analysis.summary.contains("within 1.00% threshold"));
    }

    #[test]
    fn test_mismatched_dimensions_are_fatal() {
        let err = PixelDiffResult::new(
            Dimensions::new(1280, 800),
            Dimensions::new(1280, 801),
            0,
            None,
        )
        .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_buffer_not_matching_dimensions_is_fatal() {
        let mut diff = without_data(5.0);
        diff.diff_data = Some(vec![0u8; 16]);
        let err = analyze_comparison(&diff, DEFAULT_THRESHOLD_PERCENT).unwrap_err();
        assert!(matches!(err, PageSenseError::InvalidBitmap(_)));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        assert!(analyze_comparison(&without_data(5.0), -1.0).is_err());
        assert!(analyze_comparison(&without_data(5.0), f64::NAN).is_err());
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let data = diff_mask(100, 100, |x, _| x < 3);
        let diff = PixelDiffResult::from_diff_data(Dimensions::new(100, 100), data).unwrap();
        let a = serde_json::to_string(&analyze_comparison(&diff, 1.0).unwrap()).unwrap();
        let b = serde_json::to_string(&analyze_comparison(&diff, 1.0).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_threshold_only_changes_summary() {
        let data = diff_mask(100, 100, |x, y| y == 50 && x >= 20);
        let diff = PixelDiffResult::from_diff_data(Dimensions::new(100, 100), data).unwrap();
        let strict = ComparisonConfig { threshold_percent: 0.5 };

        let analysis = analyze_with_config(&diff, &strict).unwrap();
        assert_eq!(analysis.verdict, ComparisonVerdict::ExpectedChange);
        assert!(analysis.summary.contains("in minor regions"));
    }

    #[test]
    fn test_verdict_serializes_screaming_case() {
        let json = serde_json::to_string(&ComparisonVerdict::LayoutBroken).unwrap();
        assert_eq!(json, "\"LAYOUT_BROKEN\"");
    }
}
