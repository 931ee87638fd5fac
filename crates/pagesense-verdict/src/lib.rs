//! # pagesense-verdict
//!
//! Merges every issue stream for a page into one ordered list and a single
//! coarse decision.
//!
//! Sources, in merge order:
//!
//! 1. Element audit issues from an external inspector
//! 2. Interactivity issues, deduplicated against the element audit
//! 3. Semantic issues synthesized from page intent and page state
//! 4. Console reports, with noise entries dropped
//!
//! [`determine_verdict`] answers "is this page healthy" from issue counts;
//! [`determine_health`] lets critical page errors and active loading override
//! that answer.

pub mod aggregate;
pub mod console;
pub mod report;
pub mod semantic;
pub mod verdict;

pub use aggregate::{aggregate_issues, InteractivityIssue, IssueSources};
pub use console::{ConsoleEntry, ConsoleFilter, ConsoleLevel};
pub use report::{assess_page, PageReport};
pub use semantic::semantic_issues;
pub use verdict::{determine_health, determine_verdict, IssueCounts, PageHealth, ScanVerdict};

pub use pagesense_core::{Issue, IssueCategory, IssueSeverity, PageSenseError, Result};
