//! Authentication state detection
//!
//! Positive evidence (logout control, user menu, greeting) and negative
//! evidence (login links, "please sign in" banners) are scored as two
//! polarities. The stronger polarity decides, but anything below
//! [`AUTH_MIN_CONFIDENCE`] is reported as indeterminate, never as `false`.

use pagesense_signals::names::*;
use pagesense_signals::SignalRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scorer::{Category, Scorer, ScoringRule};

/// Calibration constant: confidence below this collapses to indeterminate
pub const AUTH_MIN_CONFIDENCE: f64 = 0.3;

/// Which way the auth evidence points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPolarity {
    Authenticated,
    Anonymous,
    Indeterminate,
}

impl Category for AuthPolarity {
    const ALL: &'static [Self] = &[Self::Authenticated, Self::Anonymous, Self::Indeterminate];
    const FALLBACK: Self = Self::Indeterminate;

    fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::Anonymous => "anonymous",
            Self::Indeterminate => "indeterminate",
        }
    }
}

/// Default auth scoring table
pub fn auth_rules() -> Vec<ScoringRule<AuthPolarity>> {
    use AuthPolarity::*;

    vec![
        ScoringRule::new(HAS_LOGOUT_BUTTON, Authenticated, 40, "Logout control present"),
        ScoringRule::new(HAS_AUTH_REQUIRED_MESSAGE, Anonymous, 40, "Authentication required message"),
        ScoringRule::new(HAS_USER_MENU, Authenticated, 30, "User menu present"),
        ScoringRule::new(HAS_LOGIN_LINK, Anonymous, 30, "Login link present"),
        ScoringRule::new(HAS_WELCOME_TEXT, Authenticated, 25, "Welcome message present"),
        ScoringRule::new(HAS_PASSWORD_FIELD, Anonymous, 25, "Login form present"),
        ScoringRule::new(HAS_USERNAME_DISPLAY, Authenticated, 20, "Username displayed"),
        ScoringRule::new(HAS_SIGNUP_LINK, Anonymous, 20, "Signup link present"),
        ScoringRule::new(HAS_AUTH_COOKIE, Authenticated, 15, "Auth cookie present"),
    ]
}

/// Authentication state of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    /// `None` when the evidence is weak or balanced
    pub authenticated: Option<bool>,
    pub confidence: f64,
    /// Displayed username, only reported for authenticated pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Reasons of the rules that fired
    pub indicators: Vec<String>,
}

impl AuthState {
    pub fn indeterminate() -> Self {
        Self {
            authenticated: None,
            confidence: 0.0,
            username: None,
            indicators: Vec::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated == Some(true)
    }

    pub fn is_anonymous(&self) -> bool {
        self.authenticated == Some(false)
    }
}

/// Detect whether the page is being viewed by a signed-in user
pub fn detect_auth_state(signals: &SignalRecord) -> AuthState {
    let result = Scorer::new(auth_rules(), 0).score(signals);

    let positive = result.score_of(AuthPolarity::Authenticated);
    let negative = result.score_of(AuthPolarity::Anonymous);

    let authenticated = if positive == negative || result.confidence < AUTH_MIN_CONFIDENCE {
        None
    } else {
        match result.category {
            AuthPolarity::Authenticated => Some(true),
            AuthPolarity::Anonymous => Some(false),
            AuthPolarity::Indeterminate => None,
        }
    };

    let username = if authenticated == Some(true) {
        signals.text(USERNAME).map(str::to_string)
    } else {
        None
    };

    debug!(
        "Auth state {:?} (+{} / -{}, confidence {:.2})",
        authenticated, positive, negative, result.confidence
    );

    AuthState {
        authenticated,
        confidence: result.confidence,
        username,
        indicators: result.reasons,
    }
}
