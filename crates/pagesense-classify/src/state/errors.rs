//! Error state detection
//!
//! Collects every error pattern on the page into a typed list. The overall
//! severity is the worst individual one, so a single critical error outranks
//! any number of validation warnings.

use pagesense_signals::names::*;
use pagesense_signals::SignalRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Overall error severity, ordered from harmless to critical
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    #[default]
    None,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Kind of error shown on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageErrorKind {
    Permission,
    ServerError,
    NotFound,
    /// Toasts and banners reporting a failed request
    Api,
    Validation,
}

impl PageErrorKind {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Permission | Self::ServerError => ErrorSeverity::Critical,
            Self::NotFound | Self::Api => ErrorSeverity::Error,
            Self::Validation => ErrorSeverity::Warning,
        }
    }
}

impl std::fmt::Display for PageErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permission => write!(f, "permission"),
            Self::ServerError => write!(f, "server_error"),
            Self::NotFound => write!(f, "not_found"),
            Self::Api => write!(f, "api"),
            Self::Validation => write!(f, "validation"),
        }
    }
}

/// A single error detected on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageError {
    pub kind: PageErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
}

impl PageError {
    pub fn new(kind: PageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }
}

/// Error state of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    pub errors: Vec<PageError>,
    pub severity: ErrorSeverity,
}

impl ErrorState {
    pub fn from_errors(errors: Vec<PageError>) -> Self {
        let severity = errors
            .iter()
            .map(|e| e.severity)
            .max()
            .unwrap_or_default();
        Self { errors, severity }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether the errors block the page from being usable
    pub fn is_blocking(&self) -> bool {
        self.severity >= ErrorSeverity::Error
    }
}

/// Detect error messages shown on the page
pub fn detect_error_state(signals: &SignalRecord) -> ErrorState {
    let mut errors = Vec::new();

    if signals.flag(HAS_PERMISSION_DENIED) {
        errors.push(PageError::new(
            PageErrorKind::Permission,
            "Access denied or permission error shown",
        ));
    }
    if signals.flag(HAS_SERVER_ERROR) {
        errors.push(PageError::new(
            PageErrorKind::ServerError,
            "Server error message shown",
        ));
    }
    if signals.flag(HAS_NOT_FOUND) {
        errors.push(PageError::new(
            PageErrorKind::NotFound,
            "Not-found message shown",
        ));
    }
    if signals.is_truthy(ERROR_TOAST_COUNT) {
        let message = signals
            .text(ERROR_TOAST_TEXT)
            .map(|text| format!("Error notification: {}", text))
            .unwrap_or_else(|| "Error notification shown".to_string());
        errors.push(PageError::new(PageErrorKind::Api, message));
    }
    let invalid = signals.count(VALIDATION_ERROR_COUNT);
    if invalid > 0 {
        let plural = if invalid == 1 { "" } else { "s" };
        errors.push(PageError::new(
            PageErrorKind::Validation,
            format!("{} form field{} failed validation", invalid, plural),
        ));
    }

    let state = ErrorState::from_errors(errors);
    debug!(
        "Error state {} ({} errors)",
        state.severity,
        state.errors.len()
    );
    state
}
