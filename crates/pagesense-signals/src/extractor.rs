//! Signal extraction battery
//!
//! Evaluates a fixed list of predicates against a [`PageSnapshot`]. Each probe
//! runs through [`fail_open`](pagesense_core::fail_open), so a single broken
//! selector reads as `false`/`0` and the rest of the pass continues.

use pagesense_core::config::SignalConfig;
use pagesense_core::fail_open::{fail_open, fail_open_or_default};
use pagesense_core::Result;
use tracing::debug;

use crate::names::*;
use crate::patterns::TextPatterns;
use crate::record::SignalRecord;
use crate::snapshot::PageSnapshot;

/// CSS selectors queried by the extractor
pub mod selectors {
    pub const PASSWORD_FIELD: &str = "input[type='password']";
    pub const FORM: &str = "form";
    pub const INPUT_FIELD: &str = "input:not([type='hidden']):not([type='submit']):not([type='button']), textarea, select";
    pub const SUBMIT_BUTTON: &str = "button[type='submit'], input[type='submit']";
    pub const LIST_ITEM: &str = "ul > li, ol > li, [role='listitem']";
    pub const CARD: &str =
        "[class~='card'], [class^='card-'], [class*=' card-'], [class*='-card'], article";
    pub const TABLE_ROW: &str = "table tbody tr";
    pub const PAGINATION: &str = ".pagination, [class*='pagination'], [aria-label*='pagination' i]";
    pub const FILTER_CONTROL: &str = "[class*='filter'], [role='search'], input[type='search']";
    pub const CHART: &str = "canvas, svg[class*='chart'], [class~='chart'], [class^='chart-'], [class*=' chart-'], [class*='-chart'], [class~='graph'], [class^='graph-'], [class*=' graph-']";
    pub const WIDGET: &str = "[class*='widget'], [class*='stat-card'], [class*='metric'], [class*='kpi']";
    pub const SIDEBAR: &str = "aside, [class*='sidebar']";
    pub const BREADCRUMB: &str = "[aria-label*='breadcrumb' i], [class*='breadcrumb']";
    pub const ARTICLE_BODY: &str = "[itemprop='articleBody'], article p, main h1 ~ p";
    pub const PRICE: &str = "[class*='price'], [itemprop='price']";
    pub const HERO: &str = "[class*='hero'], .jumbotron, [class*='banner-main']";
    pub const HERO_CANDIDATE: &str = "main > section:first-of-type, body > header + section";
    pub const CTA: &str = "a[class*='btn'], a[class*='button'], [class*='cta']";
    pub const HEADING: &str = "h1";
    pub const EMPTY_STATE: &str = "[class*='empty-state'], [class*='emptyState'], [class*='no-results']";

    pub const LOGOUT_CONTROL: &str = "[href*='logout' i], [href*='signout' i], [href*='sign-out' i], [class*='logout' i], [data-action='logout']";
    pub const USER_MENU: &str = "[class*='user-menu'], [class*='usermenu'], [class*='avatar'], [class*='profile-menu'], [aria-label*='account' i]";
    pub const USERNAME_DISPLAY: &str = "[class*='username'], [class*='user-name'], [data-testid*='username']";
    pub const LOGIN_LINK: &str = "a[href*='login' i], a[href*='signin' i], a[href*='sign-in' i]";
    pub const SIGNUP_LINK: &str = "a[href*='signup' i], a[href*='sign-up' i], a[href*='register' i]";

    pub const SPINNER: &str = "[class*='spinner'], [class*='loader'], [class*='loading-indicator'], .loading";
    pub const SKELETON: &str = "[class*='skeleton'], [class*='shimmer'], [class*='placeholder-glow']";
    pub const PROGRESS: &str = "progress, [role='progressbar']";
    pub const LAZY_PENDING: &str = "img[data-src]:not([src]), [class*='lazyload']:not([class*='lazyloaded'])";
    pub const BUSY_ROOT: &str = "body[aria-busy='true'], html[aria-busy='true']";
    pub const BODY: &str = "body";

    pub const VALIDATION_ERROR: &str = "[aria-invalid='true'], .field-error, [class*='invalid-feedback'], [class*='error-message']";
    pub const ERROR_TOAST: &str = "[class*='toast'][class*='error'], [class*='alert-danger'], [class*='alert-error'], [role='alert'][class*='error'], [class*='banner'][class*='error']";
}

/// Page text fetched once per pass
struct PageText {
    body: Option<String>,
    title: String,
    /// First `h1`
    heading: String,
}

impl PageText {
    /// Title plus first heading
    fn headline(&self) -> String {
        format!("{} {}", self.title, self.heading)
    }
}

/// Thin fail-open wrapper over a snapshot
struct Probe<'a> {
    snapshot: &'a dyn PageSnapshot,
}

impl Probe<'_> {
    fn count(&self, selector: &str) -> u64 {
        fail_open_or_default(selector, || self.snapshot.count(selector)) as u64
    }

    fn exists(&self, selector: &str) -> bool {
        fail_open_or_default(selector, || self.snapshot.exists(selector))
    }

    fn element_text(&self, selector: &str) -> Option<String> {
        fail_open(selector, || self.snapshot.element_text(selector))
            .flatten()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn style(&self, selector: &str, property: &str) -> Option<String> {
        fail_open(selector, || self.snapshot.computed_style(selector, property)).flatten()
    }

    fn page_text(&self) -> PageText {
        let body = fail_open("text_content", || self.snapshot.text_content());
        let title = fail_open_or_default("title", || self.snapshot.title());
        let heading = self.element_text(selectors::HEADING).unwrap_or_default();
        PageText {
            body,
            title,
            heading,
        }
    }
}

/// Below this many visible characters a page counts as minimal
pub const MINIMAL_CONTENT_CHARS: usize = 200;

/// Minimum height in CSS pixels for a top section to count as a hero
pub const HERO_MIN_HEIGHT: f64 = 300.0;

/// Extracts a [`SignalRecord`] from a page snapshot
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    patterns: TextPatterns,
    config: SignalConfig,
}

impl SignalExtractor {
    pub fn new(config: SignalConfig) -> Result<Self> {
        Ok(Self {
            patterns: TextPatterns::compile()?,
            config,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(SignalConfig::default())
    }

    /// Run the full battery against one snapshot
    pub fn extract(&self, snapshot: &dyn PageSnapshot) -> SignalRecord {
        let probe = Probe { snapshot };
        let text = probe.page_text();
        let body = text.body.as_deref().unwrap_or("");

        let mut record = SignalRecord::new();
        self.extract_shape(&probe, &text, &mut record);
        self.extract_auth(&probe, body, &mut record);
        self.extract_loading(&probe, &mut record);
        self.extract_errors(&probe, &text, &mut record);

        debug!(
            "Extracted {} signals ({} active)",
            record.len(),
            record.active().len()
        );
        record
    }

    fn extract_shape(&self, probe: &Probe<'_>, text: &PageText, record: &mut SignalRecord) {
        let p = &self.patterns;
        let body = text.body.as_deref().unwrap_or("");

        record.set(HAS_PASSWORD_FIELD, probe.exists(selectors::PASSWORD_FIELD));
        record.set(FORM_COUNT, probe.count(selectors::FORM));
        record.set(INPUT_FIELD_COUNT, probe.count(selectors::INPUT_FIELD));
        record.set(HAS_SUBMIT_BUTTON, probe.exists(selectors::SUBMIT_BUTTON));
        record.set(HAS_LOGIN_TEXT, p.login.is_match(body));
        record.set(HAS_SIGNUP_TEXT, p.signup.is_match(body));
        record.set(HAS_FORGOT_PASSWORD, p.forgot_password.is_match(body));

        let list_items = probe.count(selectors::LIST_ITEM);
        let cards = probe.count(selectors::CARD);
        record.set(LIST_ITEM_COUNT, list_items);
        record.set(CARD_COUNT, cards);
        record.set(
            HAS_MANY_LIST_ITEMS,
            list_items.max(cards) >= self.config.many_items_min,
        );
        record.set(TABLE_ROW_COUNT, probe.count(selectors::TABLE_ROW));
        record.set(HAS_PAGINATION, probe.exists(selectors::PAGINATION));
        record.set(HAS_FILTER_CONTROLS, probe.exists(selectors::FILTER_CONTROL));

        record.set(HAS_CHART, probe.exists(selectors::CHART));
        record.set(WIDGET_COUNT, probe.count(selectors::WIDGET));
        record.set(HAS_SIDEBAR, probe.exists(selectors::SIDEBAR));

        record.set(HAS_BREADCRUMB, probe.exists(selectors::BREADCRUMB));
        record.set(HAS_ARTICLE_BODY, probe.exists(selectors::ARTICLE_BODY));
        record.set(HAS_PRICE, probe.exists(selectors::PRICE));
        record.set(HAS_ADD_TO_CART, p.add_to_cart.is_match(body));

        record.set(HAS_HERO_SECTION, self.has_hero(probe));
        record.set(CTA_COUNT, probe.count(selectors::CTA));

        record.set(HAS_ERROR_CODE, self.error_code(text).is_some());
        record.set(HAS_ERROR_HEADING, p.error_heading.is_match(&text.headline()));
        record.set(
            HAS_EMPTY_STATE,
            probe.exists(selectors::EMPTY_STATE) || p.empty_state.is_match(body),
        );
        // Unknown text is not evidence of a minimal page
        let minimal = text
            .body
            .as_deref()
            .is_some_and(|b| b.trim().chars().count() < MINIMAL_CONTENT_CHARS);
        record.set(IS_MINIMAL_CONTENT, minimal);
    }

    /// Status codes are trusted only in the title or first heading
    fn error_code(&self, text: &PageText) -> Option<String> {
        self.patterns
            .error_code(&text.title)
            .or_else(|| self.patterns.error_code(&text.heading))
    }

    fn has_hero(&self, probe: &Probe<'_>) -> bool {
        if probe.exists(selectors::HERO) {
            return true;
        }
        fail_open(selectors::HERO_CANDIDATE, || {
            probe.snapshot.bounding_box(selectors::HERO_CANDIDATE)
        })
        .flatten()
        .is_some_and(|bbox| bbox.height >= HERO_MIN_HEIGHT && bbox.y < HERO_MIN_HEIGHT)
    }

    fn extract_auth(
        &self,
        probe: &Probe<'_>,
        body: &str,
        record: &mut SignalRecord,
    ) {
        let p = &self.patterns;

        record.set(
            HAS_LOGOUT_BUTTON,
            probe.exists(selectors::LOGOUT_CONTROL) || p.logout.is_match(body),
        );
        record.set(HAS_USER_MENU, probe.exists(selectors::USER_MENU));

        let welcome_name = p.welcome_name(body);
        record.set(HAS_WELCOME_TEXT, welcome_name.is_some());

        let displayed_name = probe
            .element_text(selectors::USERNAME_DISPLAY)
            .filter(|name| name.chars().count() <= 64);
        record.set(HAS_USERNAME_DISPLAY, displayed_name.is_some());

        if let Some(name) = welcome_name.or(displayed_name) {
            record.set(USERNAME, name);
        }

        let cookies = fail_open_or_default("cookie_names", || probe.snapshot.cookie_names());
        record.set(HAS_AUTH_COOKIE, cookies.iter().any(|c| is_auth_cookie(c)));

        record.set(HAS_LOGIN_LINK, probe.exists(selectors::LOGIN_LINK));
        record.set(HAS_SIGNUP_LINK, probe.exists(selectors::SIGNUP_LINK));
        record.set(HAS_AUTH_REQUIRED_MESSAGE, p.auth_required.is_match(body));
    }

    fn extract_loading(&self, probe: &Probe<'_>, record: &mut SignalRecord) {
        record.set(SPINNER_COUNT, probe.count(selectors::SPINNER));
        record.set(SKELETON_COUNT, probe.count(selectors::SKELETON));
        record.set(PROGRESS_COUNT, probe.count(selectors::PROGRESS));
        record.set(LAZY_LOAD_COUNT, probe.count(selectors::LAZY_PENDING));

        let busy_cursor = probe
            .style(selectors::BODY, "cursor")
            .is_some_and(|c| matches!(c.trim(), "wait" | "progress"));
        record.set(BODY_BUSY, probe.exists(selectors::BUSY_ROOT) || busy_cursor);
    }

    fn extract_errors(&self, probe: &Probe<'_>, text: &PageText, record: &mut SignalRecord) {
        let p = &self.patterns;
        let body = text.body.as_deref().unwrap_or("");
        let code = self.error_code(text);
        let code = code.as_deref();

        record.set(
            HAS_PERMISSION_DENIED,
            p.permission_denied.is_match(body) || matches!(code, Some("401" | "403")),
        );
        record.set(
            HAS_NOT_FOUND,
            p.not_found.is_match(body) || matches!(code, Some("404" | "410")),
        );
        record.set(
            HAS_SERVER_ERROR,
            p.server_error.is_match(body) || code.is_some_and(|c| c.starts_with('5')),
        );
        record.set(VALIDATION_ERROR_COUNT, probe.count(selectors::VALIDATION_ERROR));
        record.set(ERROR_TOAST_COUNT, probe.count(selectors::ERROR_TOAST));
        if let Some(message) = probe.element_text(selectors::ERROR_TOAST) {
            record.set(ERROR_TOAST_TEXT, message);
        }
    }
}

fn is_auth_cookie(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    // Anti-forgery tokens are set for anonymous visitors too
    if name.contains("csrf") || name.contains("xsrf") {
        return false;
    }
    ["session", "auth", "token", "jwt"]
        .iter()
        .any(|marker| name.contains(marker))
        || name == "sid"
        || name.ends_with(".sid")
        || name.ends_with("_sid")
}

/// Extract signals with the default configuration
pub fn extract_signals(snapshot: &dyn PageSnapshot) -> Result<SignalRecord> {
    Ok(SignalExtractor::with_defaults()?.extract(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{BoundingBox, StaticSnapshot};

    fn extractor() -> SignalExtractor {
        SignalExtractor::with_defaults().unwrap()
    }

    #[test]
    fn test_empty_snapshot_has_no_active_signals_except_minimal() {
        let record = extractor().extract(&StaticSnapshot::new());
        assert_eq!(record.active(), vec![IS_MINIMAL_CONTENT]);
    }

    #[test]
    fn test_login_page_signals() {
        let snapshot = StaticSnapshot::new()
            .with_count(selectors::PASSWORD_FIELD, 1)
            .with_count(selectors::FORM, 1)
            .with_count(selectors::INPUT_FIELD, 2)
            .with_count(selectors::SUBMIT_BUTTON, 1)
            .with_body_text("Sign in to your account. Forgot password?");
        let record = extractor().extract(&snapshot);

        assert!(record.flag(HAS_PASSWORD_FIELD));
        assert!(record.flag(HAS_LOGIN_TEXT));
        assert!(record.flag(HAS_FORGOT_PASSWORD));
        assert_eq!(record.count(INPUT_FIELD_COUNT), 2);
        assert!(!record.flag(HAS_LOGOUT_BUTTON));
    }

    #[test]
    fn test_many_list_items_threshold() {
        let four = StaticSnapshot::new().with_count(selectors::LIST_ITEM, 4);
        assert!(!extractor().extract(&four).flag(HAS_MANY_LIST_ITEMS));

        let five_cards = StaticSnapshot::new().with_count(selectors::CARD, 5);
        assert!(extractor().extract(&five_cards).flag(HAS_MANY_LIST_ITEMS));
    }

    #[test]
    fn test_custom_many_items_min() {
        let extractor = SignalExtractor::new(SignalConfig { many_items_min: 10 }).unwrap();
        let snapshot = StaticSnapshot::new().with_count(selectors::LIST_ITEM, 8);
        assert!(!extractor.extract(&snapshot).flag(HAS_MANY_LIST_ITEMS));
    }

    #[test]
    fn test_failing_selector_reads_as_absent() {
        let snapshot = StaticSnapshot::new()
            .with_count(selectors::CHART, 3)
            .with_failing(selectors::CHART)
            .with_count(selectors::SIDEBAR, 1);
        let record = extractor().extract(&snapshot);

        assert!(!record.flag(HAS_CHART));
        assert!(record.flag(HAS_SIDEBAR));
    }

    #[test]
    fn test_username_from_welcome_text() {
        let snapshot = StaticSnapshot::new()
            .with_count(selectors::LOGOUT_CONTROL, 1)
            .with_body_text("Welcome back, Priya. Here is your summary.");
        let record = extractor().extract(&snapshot);

        assert!(record.flag(HAS_WELCOME_TEXT));
        assert!(record.flag(HAS_LOGOUT_BUTTON));
        assert_eq!(record.text(USERNAME), Some("Priya"));
    }

    #[test]
    fn test_username_from_display_element() {
        let snapshot =
            StaticSnapshot::new().with_element_text(selectors::USERNAME_DISPLAY, "  jdoe  ");
        let record = extractor().extract(&snapshot);

        assert!(record.flag(HAS_USERNAME_DISPLAY));
        assert_eq!(record.text(USERNAME), Some("jdoe"));
    }

    #[test]
    fn test_auth_cookie_detection() {
        assert!(is_auth_cookie("connect.sid"));
        assert!(is_auth_cookie("SESSIONID"));
        assert!(is_auth_cookie("auth_token"));
        assert!(!is_auth_cookie("theme"));
        assert!(!is_auth_cookie("consid"));
    }

    #[test]
    fn test_anti_forgery_cookies_are_not_auth() {
        assert!(!is_auth_cookie("csrftoken"));
        assert!(!is_auth_cookie("XSRF-TOKEN"));
        assert!(!is_auth_cookie("_csrf"));
        assert!(is_auth_cookie("session_id"));

        let snapshot = StaticSnapshot::new()
            .with_cookie("csrftoken")
            .with_cookie("XSRF-TOKEN");
        assert!(!extractor().extract(&snapshot).flag(HAS_AUTH_COOKIE));
    }

    #[test]
    fn test_busy_cursor_counts_as_body_busy() {
        let snapshot = StaticSnapshot::new().with_style(selectors::BODY, "cursor", "wait");
        assert!(extractor().extract(&snapshot).flag(BODY_BUSY));
    }

    #[test]
    fn test_hero_from_geometry() {
        let tall = BoundingBox { x: 0.0, y: 64.0, width: 1280.0, height: 480.0 };
        let snapshot = StaticSnapshot::new().with_box(selectors::HERO_CANDIDATE, tall);
        assert!(extractor().extract(&snapshot).flag(HAS_HERO_SECTION));

        let short = BoundingBox { x: 0.0, y: 64.0, width: 1280.0, height: 120.0 };
        let snapshot = StaticSnapshot::new().with_box(selectors::HERO_CANDIDATE, short);
        assert!(!extractor().extract(&snapshot).flag(HAS_HERO_SECTION));
    }

    #[test]
    fn test_status_code_in_headline() {
        let snapshot = StaticSnapshot::new()
            .with_title("404")
            .with_element_text(selectors::HEADING, "Page not found");
        let record = extractor().extract(&snapshot);

        assert!(record.flag(HAS_ERROR_CODE));
        assert!(record.flag(HAS_ERROR_HEADING));
        assert!(record.flag(HAS_NOT_FOUND));
        assert!(!record.flag(HAS_SERVER_ERROR));
    }

    #[test]
    fn test_status_code_in_body_is_not_trusted() {
        let snapshot = StaticSnapshot::new().with_body_text("Order 404 shipped on time");
        let record = extractor().extract(&snapshot);
        assert!(!record.flag(HAS_ERROR_CODE));
        assert!(!record.flag(HAS_NOT_FOUND));
    }

    #[test]
    fn test_number_in_ordinary_title_is_not_an_error_page() {
        let snapshot = StaticSnapshot::new()
            .with_title("Fortune 500 Companies 2024")
            .with_element_text(selectors::HEADING, "Top 404 Recipes of the Year");
        let record = extractor().extract(&snapshot);

        assert!(!record.flag(HAS_ERROR_CODE));
        assert!(!record.flag(HAS_SERVER_ERROR));
        assert!(!record.flag(HAS_NOT_FOUND));
    }

    #[test]
    fn test_server_error_title_sets_server_error() {
        let snapshot = StaticSnapshot::new()
            .with_title("500 Internal Server Error")
            .with_element_text(selectors::HEADING, "Something went wrong");
        let record = extractor().extract(&snapshot);

        assert!(record.flag(HAS_ERROR_CODE));
        assert!(record.flag(HAS_ERROR_HEADING));
        assert!(record.flag(HAS_SERVER_ERROR));
        assert!(!record.flag(HAS_PERMISSION_DENIED));
    }

    #[test]
    fn test_error_code_in_heading_only() {
        let snapshot = StaticSnapshot::new()
            .with_title("Example Shop")
            .with_element_text(selectors::HEADING, "Error 403");
        let record = extractor().extract(&snapshot);
        assert!(record.flag(HAS_ERROR_CODE));
        assert!(record.flag(HAS_PERMISSION_DENIED));
    }

    /// Evaluates the `tag`, `[class~=]`, `[class^=]` and `[class*=]` arms
    /// of a selector list against one element
    fn selector_matches(selector: &str, tag: &str, class: &str) -> bool {
        selector.split(',').map(str::trim).any(|arm| {
            let (arm_tag, attr) = match arm.find('[') {
                Some(i) => (&arm[..i], Some(&arm[i..])),
                None => (arm, None),
            };
            if !arm_tag.is_empty() && arm_tag != tag {
                return false;
            }
            let Some(attr) = attr else { return true };
            let Some(rest) = attr.strip_prefix("[class") else {
                return false;
            };
            let value = |op: &str| {
                rest.strip_prefix(op)
                    .and_then(|v| v.strip_suffix("']"))
                    .map(str::to_string)
            };
            if let Some(v) = value("~='") {
                class.split_whitespace().any(|token| token == v)
            } else if let Some(v) = value("^='") {
                class.starts_with(&v)
            } else if let Some(v) = value("*='") {
                class.contains(&v)
            } else {
                false
            }
        })
    }

    #[test]
    fn test_chart_selector_ignores_unrelated_class_names() {
        assert!(!selector_matches(selectors::CHART, "p", "MuiTypography-root MuiTypography-body1"));
        assert!(!selector_matches(selectors::CHART, "p", "paragraph-lead"));
        assert!(!selector_matches(selectors::CHART, "div", "photograph"));
        assert!(!selector_matches(selectors::CHART, "div", "chartreuse-theme"));

        assert!(selector_matches(selectors::CHART, "canvas", ""));
        assert!(selector_matches(selectors::CHART, "div", "chart-container"));
        assert!(selector_matches(selectors::CHART, "div", "panel sales-chart"));
        assert!(selector_matches(selectors::CHART, "div", "chart"));
        assert!(selector_matches(selectors::CHART, "section", "graph-panel"));
    }

    #[test]
    fn test_card_selector_ignores_unrelated_class_names() {
        assert!(!selector_matches(selectors::CARD, "button", "discard-btn"));
        assert!(!selector_matches(selectors::CARD, "div", "scorecard"));

        assert!(selector_matches(selectors::CARD, "div", "card"));
        assert!(selector_matches(selectors::CARD, "div", "product-card"));
        assert!(selector_matches(selectors::CARD, "div", "grid card-body"));
        assert!(selector_matches(selectors::CARD, "article", ""));
    }

    #[test]
    fn test_error_toast_text_captured() {
        let snapshot = StaticSnapshot::new()
            .with_element_text(selectors::ERROR_TOAST, "Could not save changes");
        let record = extractor().extract(&snapshot);
        assert_eq!(record.count(ERROR_TOAST_COUNT), 1);
        assert_eq!(record.text(ERROR_TOAST_TEXT), Some("Could not save changes"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let snapshot = StaticSnapshot::new()
            .with_count(selectors::TABLE_ROW, 12)
            .with_body_text("Welcome, Sam");
        let a = serde_json::to_string(&extractor().extract(&snapshot)).unwrap();
        let b = serde_json::to_string(&extractor().extract(&snapshot)).unwrap();
        assert_eq!(a, b);
    }
}
