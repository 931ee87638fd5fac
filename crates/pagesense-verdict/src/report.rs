//! Whole-page assessment

use pagesense_classify::{detect_page_state, IntentClassifier, IntentResult, PageState};
use pagesense_core::{Issue, PageSenseConfig};
use pagesense_signals::SignalRecord;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::{aggregate_issues, IssueSources};
use crate::semantic::semantic_issues;
use crate::verdict::{determine_health, IssueCounts, PageHealth, ScanVerdict};

/// Everything decided about one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub intent: IntentResult,
    pub state: PageState,
    pub issues: Vec<Issue>,
    pub counts: IssueCounts,
    pub verdict: ScanVerdict,
    pub health: PageHealth,
}

impl PageReport {
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }
}

/// Classify a page, synthesize semantic issues and merge external findings
///
/// Semantic issues already present in `external` are kept ahead of the
/// synthesized ones.
pub fn assess_page(
    signals: &SignalRecord,
    external: IssueSources,
    config: &PageSenseConfig,
) -> PageReport {
    let intent = IntentClassifier::new().classify(signals);
    let state = detect_page_state(signals);

    let mut sources = external;
    sources.semantic.extend(semantic_issues(&intent, &state));

    let issues = aggregate_issues(sources, &config.console);
    let counts = IssueCounts::from_issues(&issues);
    let verdict = counts.verdict();
    let health = determine_health(verdict, &state);

    info!(
        "Assessed {} page: verdict {}, health {} ({} issue(s))",
        intent.category,
        verdict,
        health,
        issues.len()
    );

    PageReport {
        intent,
        state,
        issues,
        counts,
        verdict,
        health,
    }
}
