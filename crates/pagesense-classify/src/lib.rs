//! # pagesense-classify
//!
//! Turns a [`SignalRecord`](pagesense_signals::SignalRecord) into graded,
//! explainable decisions.
//!
//! This crate provides:
//! - A shared signal scorer driven by declarative rule tables
//! - Page-intent classification over nine categories
//! - Independent auth, loading and error state detectors
//!
//! Every entry point is a pure function of its input. Classifiers are built
//! from explicit rule tables; there is no global registry.

pub mod intent;
pub mod scorer;
pub mod state;

pub use intent::{classify_intent, intent_rules, IntentClassifier, IntentResult, PageIntent};
pub use scorer::{Category, ClassificationResult, Scorer, ScoringRule};
pub use state::auth::{detect_auth_state, AuthState};
pub use state::errors::{detect_error_state, ErrorSeverity, ErrorState, PageError, PageErrorKind};
pub use state::loading::{detect_loading_state, LoadingKind, LoadingState};
pub use state::{detect_page_state, is_ready, PageState};
