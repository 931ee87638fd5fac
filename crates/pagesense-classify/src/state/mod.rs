//! Page-state detectors
//!
//! Auth, loading and error detection run independently over the same signal
//! record and never compete with each other or with intent. Readiness is
//! derived on demand, not stored.

pub mod auth;
pub mod errors;
pub mod loading;

use pagesense_signals::SignalRecord;
use serde::{Deserialize, Serialize};

use auth::{detect_auth_state, AuthState};
use errors::{detect_error_state, ErrorSeverity, ErrorState};
use loading::{detect_loading_state, LoadingState};

/// All three state results for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageState {
    pub auth: AuthState,
    pub loading: LoadingState,
    pub errors: ErrorState,
}

impl PageState {
    pub fn is_ready(&self) -> bool {
        is_ready(&self.loading, &self.errors)
    }
}

/// Run every state detector
pub fn detect_page_state(signals: &SignalRecord) -> PageState {
    PageState {
        auth: detect_auth_state(signals),
        loading: detect_loading_state(signals),
        errors: detect_error_state(signals),
    }
}

/// Ready means not loading and no error or critical error shown
pub fn is_ready(loading: &LoadingState, errors: &ErrorState) -> bool {
    !loading.loading && !matches!(errors.severity, ErrorSeverity::Error | ErrorSeverity::Critical)
}
