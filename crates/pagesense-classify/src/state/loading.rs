//! Loading state detection

use pagesense_signals::names::*;
use pagesense_signals::SignalRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kind of loading indicator, in reporting priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingKind {
    Spinner,
    Skeleton,
    Progress,
    LazyLoad,
    BodyBusy,
}

impl LoadingKind {
    /// Every kind, highest priority first
    pub const PRIORITY: [Self; 5] = [
        Self::Spinner,
        Self::Skeleton,
        Self::Progress,
        Self::LazyLoad,
        Self::BodyBusy,
    ];

    /// Signal carrying this kind's element count
    pub fn signal(&self) -> &'static str {
        match self {
            Self::Spinner => SPINNER_COUNT,
            Self::Skeleton => SKELETON_COUNT,
            Self::Progress => PROGRESS_COUNT,
            Self::LazyLoad => LAZY_LOAD_COUNT,
            Self::BodyBusy => BODY_BUSY,
        }
    }
}

impl std::fmt::Display for LoadingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spinner => write!(f, "spinner"),
            Self::Skeleton => write!(f, "skeleton"),
            Self::Progress => write!(f, "progress"),
            Self::LazyLoad => write!(f, "lazy_load"),
            Self::BodyBusy => write!(f, "body_busy"),
        }
    }
}

/// Loading state of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingState {
    pub loading: bool,
    /// Highest-priority indicator kind present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LoadingKind>,
    /// Matching indicators across all kinds
    pub indicator_count: u64,
}

impl LoadingState {
    pub fn idle() -> Self {
        Self {
            loading: false,
            kind: None,
            indicator_count: 0,
        }
    }
}

/// Detect active loading indicators
///
/// Only the first kind in [`LoadingKind::PRIORITY`] order is reported, even
/// when several kinds are present at once.
pub fn detect_loading_state(signals: &SignalRecord) -> LoadingState {
    let kind = LoadingKind::PRIORITY
        .iter()
        .copied()
        .find(|kind| signals.is_truthy(kind.signal()));

    let indicator_count: u64 = LoadingKind::PRIORITY
        .iter()
        .map(|kind| signals.count(kind.signal()))
        .sum();

    debug!("Loading state {:?} ({} indicators)", kind, indicator_count);

    LoadingState {
        loading: kind.is_some(),
        kind,
        indicator_count,
    }
}
