//! # pagesense-signals
//!
//! Turns a page snapshot into a flat, immutable [`SignalRecord`].
//!
//! The snapshot itself comes from an external browser driver through the
//! [`PageSnapshot`] trait. Extraction evaluates a fixed battery of predicates
//! ("has password field", "list-item count", "has skeleton class", ...) and
//! every predicate fails open: a broken selector yields `false`/`0` instead of
//! aborting the pass.

pub mod extractor;
pub mod names;
pub mod patterns;
pub mod record;
pub mod snapshot;

pub use extractor::{extract_signals, SignalExtractor};
pub use pagesense_core::{PageSenseError, Result};
pub use record::{SignalRecord, SignalValue};
pub use snapshot::{BoundingBox, PageSnapshot, StaticSnapshot};
