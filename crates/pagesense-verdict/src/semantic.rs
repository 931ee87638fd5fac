//! Issues synthesized from page intent and page state
//!
//! A state flag alone is easy to miss, so contradictions between what a page
//! is and the state it is in become first-class issues.

use pagesense_classify::{ErrorSeverity, IntentResult, PageIntent, PageState};
use pagesense_core::{Issue, IssueCategory, IssueSeverity};
use tracing::debug;

/// Intents whose content should only be reachable after signing in
const PROTECTED_INTENTS: [PageIntent; 3] =
    [PageIntent::Dashboard, PageIntent::Detail, PageIntent::Form];

fn issue_severity(severity: ErrorSeverity) -> IssueSeverity {
    match severity {
        ErrorSeverity::Critical | ErrorSeverity::Error => IssueSeverity::Error,
        ErrorSeverity::Warning => IssueSeverity::Warning,
        ErrorSeverity::None => IssueSeverity::Info,
    }
}

/// Synthesize semantic issues for one page
///
/// Order: auth contradictions, error intent, detected page errors, loading.
pub fn semantic_issues(intent: &IntentResult, state: &PageState) -> Vec<Issue> {
    let mut issues = Vec::new();

    if PROTECTED_INTENTS.contains(&intent.category) && state.auth.is_anonymous() {
        issues.push(
            Issue::error(
                IssueCategory::Semantic,
                format!("Protected {} page is visible without authentication", intent.category),
            )
            .with_fix("Require a signed-in session or redirect to the login page"),
        );
    }

    if intent.category == PageIntent::Auth && state.auth.is_authenticated() {
        issues.push(
            Issue::warning(
                IssueCategory::Semantic,
                "Login page is shown to an authenticated user",
            )
            .with_fix("Redirect signed-in users away from the login page"),
        );
    }

    if intent.category == PageIntent::Error {
        issues.push(Issue::error(
            IssueCategory::Semantic,
            format!(
                "Page looks like an error page ({:.0}% confidence)",
                intent.confidence * 100.0
            ),
        ));
    }

    for error in &state.errors.errors {
        issues.push(Issue::new(
            IssueCategory::Content,
            issue_severity(error.severity),
            error.message.clone(),
        ));
    }

    if state.loading.loading {
        let kind = state
            .loading
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        issues.push(
            Issue::warning(
                IssueCategory::Semantic,
                format!(
                    "Page is still loading ({}, {} indicator(s))",
                    kind, state.loading.indicator_count
                ),
            )
            .with_fix("Wait for the page to settle before inspecting it"),
        );
    }

    debug!(
        "Synthesized {} semantic issue(s) for {} page",
        issues.len(),
        intent.category
    );
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesense_classify::{
        AuthState, ErrorState, LoadingKind, LoadingState, PageError, PageErrorKind,
    };
    use std::collections::BTreeMap;

    fn intent(category: PageIntent) -> IntentResult {
        IntentResult {
            category,
            confidence: 0.6,
            reasons: Vec::new(),
            secondary: None,
            scores: BTreeMap::new(),
        }
    }

    fn state(authenticated: Option<bool>) -> PageState {
        PageState {
            auth: AuthState {
                authenticated,
                confidence: 0.5,
                username: None,
                indicators: Vec::new(),
            },
            loading: LoadingState::idle(),
            errors: ErrorState::default(),
        }
    }

    #[test]
    fn test_dashboard_without_auth_is_error() {
        let issues = semantic_issues(&intent(PageIntent::Dashboard), &state(Some(false)));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(
            issues[0].message,
            "Protected dashboard page is visible without authentication"
        );
    }

    #[test]
    fn test_indeterminate_auth_is_not_flagged() {
        assert!(semantic_issues(&intent(PageIntent::Dashboard), &state(None)).is_empty());
        assert!(semantic_issues(&intent(PageIntent::Listing), &state(Some(false))).is_empty());
    }

    #[test]
    fn test_login_page_while_authenticated_is_warning() {
        let issues = semantic_issues(&intent(PageIntent::Auth), &state(Some(true)));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_warning());
    }

    #[test]
    fn test_page_errors_map_severity() {
        let mut page = state(None);
        page.errors = ErrorState::from_errors(vec![
            PageError::new(PageErrorKind::ServerError, "Server error"),
            PageError::new(PageErrorKind::Validation, "2 form field(s) failed validation"),
        ]);
        let issues = semantic_issues(&intent(PageIntent::Error), &page);

        let severities: Vec<_> = issues.iter().map(|i| i.severity).collect();
        assert_eq!(
            severities,
            vec![IssueSeverity::Error, IssueSeverity::Error, IssueSeverity::Warning]
        );
        assert_eq!(issues[1].message, "Server error");
        assert_eq!(issues[1].category, IssueCategory::Content);
    }

    #[test]
    fn test_loading_is_warning() {
        let mut page = state(None);
        page.loading = LoadingState {
            loading: true,
            kind: Some(LoadingKind::Skeleton),
            indicator_count: 4,
        };
        let issues = semantic_issues(&intent(PageIntent::Unknown), &page);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "Page is still loading (skeleton, 4 indicator(s))"
        );
    }
}
