//! Headless Chrome adapter for pagesense
//!
//! Drives a Chrome/Chromium tab over the Chrome DevTools Protocol (CDP) and
//! exposes it as a [`PageSnapshot`](pagesense_signals::PageSnapshot), so the
//! signal extractor can query the live DOM.
//!
//! # Example
//!
//! ```no_run
//! use pagesense_browser::{inspect_page, BrowserSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = BrowserSession::launch().await?;
//!     session.navigate("https://example.com").await?;
//!
//!     let inspection = inspect_page(&session).await?;
//!     println!(
//!         "{} ({:.0}%), ready: {}",
//!         inspection.intent.category,
//!         inspection.intent.confidence * 100.0,
//!         inspection.state.is_ready()
//!     );
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Requirements
//!
//! - Chrome or Chromium browser installed
//! - For connecting to an existing browser: `chrome --remote-debugging-port=9222`
//!
//! # Modules
//!
//! - [`browser`]: Browser lifecycle and session management
//! - [`snapshot`]: [`PageSnapshot`](pagesense_signals::PageSnapshot) over a live tab
//! - [`inspect`]: Extraction, intent and state detection for the current page
//! - [`error`]: Error types for browser operations

pub mod browser;
pub mod error;
pub mod inspect;
pub mod snapshot;

pub use browser::{BrowserConfig, BrowserSession};
pub use error::{PageSenseError, Result};
pub use inspect::{inspect_page, inspect_page_with, PageInspection};
