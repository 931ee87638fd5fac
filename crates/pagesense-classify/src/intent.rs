//! Page-intent classification
//!
//! Nine categories scored from DOM-shape signals. A top score of
//! [`UNKNOWN_THRESHOLD`] points or less is reported as [`PageIntent::Unknown`]
//! rather than a low-confidence guess.

use pagesense_signals::names::*;
use pagesense_signals::SignalRecord;
use serde::{Deserialize, Serialize};

use crate::scorer::{Category, ClassificationResult, Scorer, ScoringRule};

/// Calibration constant: winners at or below this many points are `Unknown`
pub const UNKNOWN_THRESHOLD: u32 = 20;

/// What a page is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageIntent {
    Auth,
    Form,
    Listing,
    Detail,
    Dashboard,
    Error,
    Landing,
    Empty,
    Unknown,
}

impl Category for PageIntent {
    const ALL: &'static [Self] = &[
        Self::Auth,
        Self::Form,
        Self::Listing,
        Self::Detail,
        Self::Dashboard,
        Self::Error,
        Self::Landing,
        Self::Empty,
        Self::Unknown,
    ];
    const FALLBACK: Self = Self::Unknown;

    fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Form => "form",
            Self::Listing => "listing",
            Self::Detail => "detail",
            Self::Dashboard => "dashboard",
            Self::Error => "error",
            Self::Landing => "landing",
            Self::Empty => "empty",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PageIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PageIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Invalid page intent: {}", s))
    }
}

/// Page-intent classification outcome
pub type IntentResult = ClassificationResult<PageIntent>;

/// Default intent scoring table
///
/// Rows are ordered by descending points, so the capped reasons trail lists
/// the strongest evidence first.
pub fn intent_rules() -> Vec<ScoringRule<PageIntent>> {
    use PageIntent::*;

    vec![
        ScoringRule::new(HAS_PASSWORD_FIELD, Auth, 40, "Password field present"),
        ScoringRule::new(HAS_ERROR_CODE, Error, 40, "HTTP error code in title or heading"),
        ScoringRule::new(HAS_EMPTY_STATE, Empty, 35, "Empty-state message present"),
        ScoringRule::new(HAS_CHART, Dashboard, 30, "Chart or graph elements present"),
        ScoringRule::new(HAS_ERROR_HEADING, Error, 30, "Error heading present"),
        ScoringRule::new(HAS_HERO_SECTION, Landing, 30, "Hero section present"),
        ScoringRule::new(HAS_MANY_LIST_ITEMS, Listing, 25, "Many repeated list items or cards"),
        ScoringRule::new(INPUT_FIELD_COUNT, Form, 25, "Three or more input fields").at_least(3),
        ScoringRule::new(WIDGET_COUNT, Dashboard, 25, "Three or more stat widgets").at_least(3),
        ScoringRule::new(HAS_ARTICLE_BODY, Detail, 25, "Long-form content body present"),
        ScoringRule::new(HAS_ADD_TO_CART, Detail, 25, "Purchase action present"),
        ScoringRule::new(HAS_LOGIN_TEXT, Auth, 20, "Login wording present"),
        ScoringRule::new(TABLE_ROW_COUNT, Listing, 20, "Data table with five or more rows").at_least(5),
        ScoringRule::new(HAS_PAGINATION, Listing, 20, "Pagination controls present"),
        ScoringRule::new(HAS_BREADCRUMB, Detail, 20, "Breadcrumb trail present"),
        ScoringRule::new(CTA_COUNT, Landing, 20, "Multiple call-to-action buttons").at_least(2),
        ScoringRule::new(IS_MINIMAL_CONTENT, Empty, 20, "Minimal visible content"),
        ScoringRule::new(HAS_FORGOT_PASSWORD, Auth, 15, "Forgot-password link present"),
        ScoringRule::new(FORM_COUNT, Form, 15, "Form element present"),
        ScoringRule::new(HAS_FILTER_CONTROLS, Listing, 15, "Filter or search controls present"),
        ScoringRule::new(HAS_PRICE, Detail, 15, "Price shown"),
        ScoringRule::new(HAS_SIGNUP_TEXT, Auth, 10, "Signup wording present"),
        ScoringRule::new(HAS_SUBMIT_BUTTON, Form, 10, "Submit button present"),
        ScoringRule::new(HAS_SIDEBAR, Dashboard, 10, "Sidebar navigation present"),
    ]
}

/// Page-intent classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    scorer: Scorer<PageIntent>,
}

impl IntentClassifier {
    /// Classifier with the default table and threshold
    pub fn new() -> Self {
        Self::with_rules(intent_rules())
    }

    /// Classifier with a caller-supplied table and the default threshold
    pub fn with_rules(rules: Vec<ScoringRule<PageIntent>>) -> Self {
        Self {
            scorer: Scorer::new(rules, UNKNOWN_THRESHOLD),
        }
    }

    pub fn classify(&self, signals: &SignalRecord) -> IntentResult {
        self.scorer.score(signals)
    }

    pub fn rules(&self) -> &[ScoringRule<PageIntent>] {
        self.scorer.rules()
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a page's intent with the default table
pub fn classify_intent(signals: &SignalRecord) -> IntentResult {
    IntentClassifier::new().classify(signals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_signals_is_unknown() {
        let result = classify_intent(&SignalRecord::new());
        assert_eq!(result.category, PageIntent::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.reasons.is_empty());
        assert!(result.secondary.is_none());
    }

    #[test]
    fn test_login_page() {
        let signals = SignalRecord::new()
            .with(HAS_PASSWORD_FIELD, true)
            .with(HAS_LOGIN_TEXT, true)
            .with(HAS_FORGOT_PASSWORD, true)
            .with(FORM_COUNT, 1u64)
            .with(INPUT_FIELD_COUNT, 2u64)
            .with(HAS_SUBMIT_BUTTON, true);
        let result = classify_intent(&signals);

        assert_eq!(result.category, PageIntent::Auth);
        assert_eq!(result.score_of(PageIntent::Auth), 75);
        assert!((result.confidence - 0.75).abs() < 1e-9);
        assert_eq!(result.reasons[0], "Password field present");
        // Form scored 25, which is not above 30
        assert!(result.secondary.is_none());
    }

    #[test]
    fn test_listing_needs_five_items() {
        let signals = SignalRecord::new().with(HAS_MANY_LIST_ITEMS, true);
        let result = classify_intent(&signals);
        assert_eq!(result.category, PageIntent::Listing);
        assert_eq!(result.score_of(PageIntent::Listing), 25);

        let rows = SignalRecord::new().with(TABLE_ROW_COUNT, 4u64);
        assert_eq!(classify_intent(&rows).score_of(PageIntent::Listing), 0);
    }

    #[test]
    fn test_minimal_content_alone_is_unknown() {
        let signals = SignalRecord::new().with(IS_MINIMAL_CONTENT, true);
        let result = classify_intent(&signals);
        assert_eq!(result.category, PageIntent::Unknown);
        assert_eq!(result.score_of(PageIntent::Empty), 20);
        assert!((result.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_dashboard_with_embedded_form_reports_secondary() {
        let signals = SignalRecord::new()
            .with(HAS_CHART, true)
            .with(WIDGET_COUNT, 4u64)
            .with(HAS_SIDEBAR, true)
            .with(INPUT_FIELD_COUNT, 3u64)
            .with(FORM_COUNT, 1u64)
            .with(HAS_SUBMIT_BUTTON, true);
        let result = classify_intent(&signals);

        assert_eq!(result.category, PageIntent::Dashboard);
        assert_eq!(result.score_of(PageIntent::Dashboard), 65);
        assert_eq!(result.score_of(PageIntent::Form), 50);
        assert_eq!(result.secondary, Some(PageIntent::Form));
    }

    #[test]
    fn test_auth_beats_error_on_tie() {
        let signals = SignalRecord::new()
            .with(HAS_PASSWORD_FIELD, true)
            .with(HAS_ERROR_CODE, true);
        let result = classify_intent(&signals);
        assert_eq!(result.category, PageIntent::Auth);
        assert_eq!(result.secondary, Some(PageIntent::Error));
    }

    #[test]
    fn test_error_page() {
        let signals = SignalRecord::new()
            .with(HAS_ERROR_CODE, true)
            .with(HAS_ERROR_HEADING, true)
            .with(IS_MINIMAL_CONTENT, true);
        let result = classify_intent(&signals);
        assert_eq!(result.category, PageIntent::Error);
        assert!((result.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_custom_rule_table() {
        let classifier = IntentClassifier::with_rules(vec![ScoringRule::new(
            "hasCheckoutStepper",
            PageIntent::Form,
            60,
            "Checkout stepper present",
        )]);
        let signals = SignalRecord::new()
            .with("hasCheckoutStepper", true)
            .with(HAS_PASSWORD_FIELD, true);
        let result = classifier.classify(&signals);
        assert_eq!(result.category, PageIntent::Form);
        assert_eq!(result.score_of(PageIntent::Auth), 0);
    }

    #[test]
    fn test_intent_parsing() {
        assert_eq!("Dashboard".parse::<PageIntent>().unwrap(), PageIntent::Dashboard);
        assert_eq!(PageIntent::Empty.to_string(), "empty");
        assert!("blog".parse::<PageIntent>().is_err());
    }

    #[test]
    fn test_every_rule_names_a_real_category() {
        for rule in intent_rules() {
            assert_ne!(rule.category, PageIntent::Unknown, "{}", rule.signal);
            assert!(rule.points > 0);
        }
    }
}
