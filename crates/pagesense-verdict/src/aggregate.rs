//! Issue aggregation across sources

use std::collections::HashSet;

use pagesense_core::config::ConsoleConfig;
use pagesense_core::{Issue, IssueCategory, IssueSeverity};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::console::{ConsoleEntry, ConsoleFilter};

/// Finding from the external interactivity inspector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractivityIssue {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    pub severity: IssueSeverity,
}

impl InteractivityIssue {
    pub fn new(description: impl Into<String>, severity: IssueSeverity) -> Self {
        Self {
            description: description.into(),
            element: None,
            severity,
        }
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    fn into_issue(self) -> Issue {
        let issue = Issue::new(IssueCategory::Interactivity, self.severity, self.description);
        match self.element {
            Some(element) => issue.with_element(element),
            None => issue,
        }
    }
}

/// Everything the aggregator merges for one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueSources {
    /// Element audit findings, kept as-is
    #[serde(default)]
    pub element: Vec<Issue>,
    #[serde(default)]
    pub interactivity: Vec<InteractivityIssue>,
    #[serde(default)]
    pub semantic: Vec<Issue>,
    /// Raw console capture, filtered during aggregation
    #[serde(default)]
    pub console: Vec<ConsoleEntry>,
}

impl IssueSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element_issues(mut self, issues: Vec<Issue>) -> Self {
        self.element = issues;
        self
    }

    pub fn with_interactivity_issues(mut self, issues: Vec<InteractivityIssue>) -> Self {
        self.interactivity = issues;
        self
    }

    pub fn with_semantic_issues(mut self, issues: Vec<Issue>) -> Self {
        self.semantic = issues;
        self
    }

    pub fn with_console(mut self, entries: Vec<ConsoleEntry>) -> Self {
        self.console = entries;
        self
    }
}

/// Merge all sources into one ordered issue list
///
/// Element issues come first, then interactivity issues whose description does
/// not exactly match an element issue message, then semantic issues, then
/// console issues that survive the noise filter. Issues are never rewritten.
pub fn aggregate_issues(sources: IssueSources, console: &ConsoleConfig) -> Vec<Issue> {
    let IssueSources {
        element,
        interactivity,
        semantic,
        console: entries,
    } = sources;

    let element_messages: HashSet<&str> = element.iter().map(|i| i.message.as_str()).collect();
    let interactivity: Vec<Issue> = interactivity
        .into_iter()
        .filter(|finding| {
            let duplicate = element_messages.contains(finding.description.as_str());
            if duplicate {
                debug!("Dropping duplicate interactivity issue: {}", finding.description);
            }
            !duplicate
        })
        .map(InteractivityIssue::into_issue)
        .collect();

    let console_issues = ConsoleFilter::new(console).issues(&entries);

    let mut issues =
        Vec::with_capacity(element.len() + interactivity.len() + semantic.len() + console_issues.len());
    issues.extend(element);
    issues.extend(interactivity);
    issues.extend(semantic);
    issues.extend(console_issues);

    debug!("Aggregated {} issue(s)", issues.len());
    issues
}
