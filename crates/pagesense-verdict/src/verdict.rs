//! Scan verdict and page health

use pagesense_classify::{ErrorSeverity, PageState};
use pagesense_core::{Issue, IssueSeverity};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Error-severity issues at which a scan fails
pub const FAIL_ERROR_COUNT: usize = 3;

/// Warnings at which a scan has issues even without errors
pub const ISSUES_WARNING_COUNT: usize = 5;

/// Is this page healthy, judged from its issues alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanVerdict {
    Pass,
    Issues,
    Fail,
}

impl std::fmt::Display for ScanVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Issues => write!(f, "ISSUES"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Scan verdict with page-state overrides applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageHealth {
    Pass,
    Issues,
    Fail,
    /// Still loading; issue counts are not trustworthy yet
    Loading,
    /// A critical page error is showing
    Error,
}

impl From<ScanVerdict> for PageHealth {
    fn from(verdict: ScanVerdict) -> Self {
        match verdict {
            ScanVerdict::Pass => Self::Pass,
            ScanVerdict::Issues => Self::Issues,
            ScanVerdict::Fail => Self::Fail,
        }
    }
}

impl std::fmt::Display for PageHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Issues => write!(f, "ISSUES"),
            Self::Fail => write!(f, "FAIL"),
            Self::Loading => write!(f, "LOADING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Issue totals by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

impl IssueCounts {
    pub fn from_issues(issues: &[Issue]) -> Self {
        issues.iter().fold(Self::default(), |mut counts, issue| {
            match issue.severity {
                IssueSeverity::Error => counts.errors += 1,
                IssueSeverity::Warning => counts.warnings += 1,
                IssueSeverity::Info => counts.info += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.info
    }

    /// FAIL at 3+ errors, else ISSUES at 1+ errors or 5+ warnings, else PASS
    pub fn verdict(&self) -> ScanVerdict {
        if self.errors >= FAIL_ERROR_COUNT {
            ScanVerdict::Fail
        } else if self.errors > 0 || self.warnings >= ISSUES_WARNING_COUNT {
            ScanVerdict::Issues
        } else {
            ScanVerdict::Pass
        }
    }
}

/// Coarse verdict for an aggregated issue list
pub fn determine_verdict(issues: &[Issue]) -> ScanVerdict {
    let counts = IssueCounts::from_issues(issues);
    let verdict = counts.verdict();
    info!(
        "Scan verdict {} ({} error(s), {} warning(s))",
        verdict, counts.errors, counts.warnings
    );
    verdict
}

/// Apply page-state overrides: critical errors, then loading, then the verdict
pub fn determine_health(verdict: ScanVerdict, state: &PageState) -> PageHealth {
    if state.errors.severity == ErrorSeverity::Critical {
        PageHealth::Error
    } else if state.loading.loading {
        PageHealth::Loading
    } else {
        verdict.into()
    }
}
