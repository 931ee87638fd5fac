//! Fail-open utilities for signal probes
//!
//! A page snapshot is queried by dozens of independent probes. One broken
//! selector or a detached node must not abort the whole classification pass,
//! so probes run through [`fail_open`] and a failure degrades to "absent".
//!
//! DO NOT use fail-open for:
//! - Bitmap validation (a bad buffer makes every region meaningless)
//! - Configuration loading

use tracing::warn;

use crate::Result;

/// Execute a probe that should fail open
///
/// Logs the error via `tracing::warn!` on failure and returns `None`.
///
/// # Usage
///
/// ```
/// use pagesense_core::fail_open::fail_open;
/// use pagesense_core::{PageSenseError, Result};
///
/// fn broken_probe() -> Result<usize> {
///     Err(PageSenseError::Snapshot("detached".to_string()))
/// }
///
/// assert_eq!(fail_open("spinner_count", broken_probe), None);
/// assert_eq!(fail_open("spinner_count", || Ok::<_, PageSenseError>(2)), Some(2));
/// ```
pub fn fail_open<F, T>(probe_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", probe_name, e);
            None
        }
    }
}

/// Like [`fail_open`] but substitutes the type's default value
pub fn fail_open_or_default<F, T>(probe_name: &str, f: F) -> T
where
    F: FnOnce() -> Result<T>,
    T: Default,
{
    fail_open(probe_name, f).unwrap_or_default()
}
