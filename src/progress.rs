//! Progress-callback trait for submission events.
//!
//! Inject an [`Arc<dyn SubmitProgressCallback>`] via
//! [`crate::config::ClientConfigBuilder::progress_callback`] to be
//! told when a submission starts and how it ends. The CLI uses it to drive
//! its spinner; the session stream in [`crate::stream`] is the richer
//! alternative when every state change matters.
//!
//! # Example
//!
//! ```rust
//! use doc2md::SubmitProgressCallback;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl SubmitProgressCallback for CountingCallback {
//!     fn on_submit_complete(&self, file_name: &str, markdown_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{file_name}: {markdown_len} bytes of Markdown");
//!     }
//! }
//! ```

use std::sync::Arc;

/// Called by the controller around each accepted submission.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Methods are called from whatever task runs
/// `submit`, so implementations must be `Send + Sync`.
pub trait SubmitProgressCallback: Send + Sync {
    /// Called right after the session enters `Submitting`.
    ///
    /// # Arguments
    /// * `file_name`: name of the uploaded file
    /// * `size`: payload size in bytes
    fn on_submit_start(&self, file_name: &str, size: usize) {
        let _ = (file_name, size);
    }

    /// Called once the session is `Succeeded`.
    fn on_submit_complete(&self, file_name: &str, markdown_len: usize) {
        let _ = (file_name, markdown_len);
    }

    /// Called once the session is `Failed`, with the banner text.
    fn on_submit_error(&self, file_name: &str, error: &str) {
        let _ = (file_name, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl SubmitProgressCallback for NoopProgressCallback {}

/// Convenience alias for the shared callback handle.
pub type ProgressCallback = Arc<dyn SubmitProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_submit_start("a.pdf", 10);
        cb.on_submit_complete("a.pdf", 42);
        cb.on_submit_error("a.pdf", "Failed to upload file");
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_submit_start("a.pdf", 1);
    }
}
