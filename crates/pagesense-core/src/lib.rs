//! # pagesense-core
//!
//! Core types for the pagesense page analysis workspace.
//!
//! pagesense turns noisy page signals (DOM shape, computed styles, pixel-diff
//! bitmaps) into calibrated verdicts. This crate holds what every analysis
//! stage shares:
//!
//! - A unified error type ([`PageSenseError`])
//! - Issue records produced by inspectors and merged by the aggregator
//! - Repository-level configuration loaded from `.pagesense/config.toml`
//! - Fail-open helpers for probes that must never abort a pass

mod error;
mod types;

pub mod config;
pub mod fail_open;

pub use config::PageSenseConfig;
pub use error::{PageSenseError, Result};
pub use types::*;
