//! One-call analysis of the page loaded in a session

use pagesense_classify::{detect_page_state, IntentClassifier, IntentResult, PageState};
use pagesense_signals::{SignalExtractor, SignalRecord};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::browser::BrowserSession;
use crate::error::Result;

/// Signals, intent and state for the current page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInspection {
    pub url: String,
    pub title: String,
    pub signals: SignalRecord,
    pub intent: IntentResult,
    pub state: PageState,
}

/// Settle, extract with default settings, classify
pub async fn inspect_page(session: &BrowserSession) -> Result<PageInspection> {
    let extractor = SignalExtractor::with_defaults()?;
    inspect_page_with(session, &extractor).await
}

/// Same as [`inspect_page`] with a caller-configured extractor
pub async fn inspect_page_with(
    session: &BrowserSession,
    extractor: &SignalExtractor,
) -> Result<PageInspection> {
    session.settle().await;

    let url = session.get_url().await?;
    let title = session.get_title().await.unwrap_or_default();

    let signals = extractor.extract(session);
    let intent = IntentClassifier::new().classify(&signals);
    let state = detect_page_state(&signals);

    info!(
        "Inspected {}: {} ({:.2}), ready: {}",
        url,
        intent.category,
        intent.confidence,
        state.is_ready()
    );

    Ok(PageInspection {
        url,
        title,
        signals,
        intent,
        state,
    })
}
