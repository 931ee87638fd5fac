//! Browser error types - re-exports unified PageSenseError from pagesense-core
//!
//! Launch, navigation and CDP failures use the `Browser(String)` variant.
//! Selector failures inside snapshot queries use `Selector` so the extractor
//! can treat them as absent elements.

pub use pagesense_core::{PageSenseError, Result};
