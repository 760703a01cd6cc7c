//! The Conversion Form Controller.
//!
//! Owns the [`ConversionSession`] and runs the two user actions:
//!
//! ```text
//!                 select_file
//!                     │
//!      Idle ─┐        ▼
//!    Failed ─┼──── submit ──▶ Submitting ──┬──▶ Succeeded  (markdown set, error cleared)
//! Succeeded ─┘                             └──▶ Failed     (error shown for 3 s)
//!
//!   copy_result ──▶ copy_feedback_active = true for 2 s
//! ```
//!
//! The session lives in a `watch` channel. The move into `Submitting` is a
//! single `send_if_modified`, so of two racing `submit` calls exactly one
//! sends a request and the other gets [`Doc2MdError::SubmissionInProgress`].
//! No lock is held while the request is in flight, and the request runs on
//! its own task so a caller that stops waiting never strands `Submitting`.

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::config::ClientConfig;
use crate::error::{ConversionFailure, Doc2MdError};
use crate::session::{ConversionSession, SessionSnapshot, Status};
use crate::stream::{session_updates, SessionStream};
use crate::timer::AutoClear;
use crate::transport::{ConversionTransport, HttpTransport};
use crate::upload::UploadFile;
use std::sync::{Arc, Weak};
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// What `copy_result` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Nothing to copy; no clipboard write happened.
    Skipped,
    /// The clipboard accepted the text; feedback is showing.
    Copied,
    /// The clipboard refused; nothing is shown.
    Failed,
}

/// Drives one page view. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct ConversionController {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    transport: Arc<dyn ConversionTransport>,
    clipboard: Arc<dyn Clipboard>,
    state: watch::Sender<ConversionSession>,
    error_clear: AutoClear,
    copy_clear: AutoClear,
}

impl std::fmt::Debug for ConversionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionController")
            .field("config", &self.inner.config)
            .field("status", &self.status())
            .finish()
    }
}

impl ConversionController {
    /// Build a controller around the given transport and clipboard.
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn ConversionTransport>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        let (state, _) = watch::channel(ConversionSession::new());
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                clipboard,
                state,
                error_clear: AutoClear::new(),
                copy_clear: AutoClear::new(),
            }),
        }
    }

    /// Build a controller that posts to `config.endpoint` over HTTP and
    /// copies to the system clipboard.
    pub fn from_config(config: ClientConfig) -> Result<Self, Doc2MdError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport), Arc::new(SystemClipboard)))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().snapshot()
    }

    pub fn status(&self) -> Status {
        self.inner.state.borrow().status
    }

    /// True for the whole duration of a request.
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    pub fn markdown(&self) -> String {
        self.inner.state.borrow().markdown.clone()
    }

    pub fn error_message(&self) -> String {
        self.inner.state.borrow().error_message.clone()
    }

    /// Why the last submission failed, if it did.
    pub fn last_failure(&self) -> Option<ConversionFailure> {
        self.inner.state.borrow().last_failure.clone()
    }

    pub fn copy_feedback_active(&self) -> bool {
        self.inner.state.borrow().copy_feedback_active
    }

    /// A receiver that sees every session change.
    pub fn subscribe(&self) -> watch::Receiver<ConversionSession> {
        self.inner.state.subscribe()
    }

    /// Session changes as snapshots, starting with the current one.
    pub fn updates(&self) -> SessionStream {
        session_updates(self)
    }

    // ── Actions ──────────────────────────────────────────────────────────

    /// The file picker: remember `file` for the next `submit`.
    pub fn select_file(&self, file: UploadFile) {
        if !file.is_accepted() {
            warn!(
                "'{}' is not a PDF/PNG/JPEG file; sending it anyway",
                file.name
            );
        }
        debug!("Selected {:?}", file);
        self.inner.state.send_modify(|s| s.selected_file = Some(file));
    }

    /// Select `file` and submit it.
    pub async fn submit_file(&self, file: UploadFile) -> Result<Status, Doc2MdError> {
        self.select_file(file);
        self.submit().await
    }

    /// Send the selected file to the conversion endpoint.
    ///
    /// Returns the final status (`Succeeded` or `Failed`); conversion
    /// failures land in the session, not in the `Err` branch.
    ///
    /// The request runs on its own task. Dropping the returned future stops
    /// the wait, not the request: the outcome is still recorded and the
    /// session always leaves `Submitting`.
    ///
    /// # Errors
    /// - [`Doc2MdError::NoFileSelected`]: nothing selected, nothing sent
    /// - [`Doc2MdError::SubmissionInProgress`]: a request is in flight, nothing sent
    /// - [`Doc2MdError::Internal`]: the request task panicked; the session is `Failed`
    pub async fn submit(&self) -> Result<Status, Doc2MdError> {
        let file = self.begin_submit()?;
        let this = self.clone();
        let handle = tokio::spawn(async move { this.run_submission(file).await });

        match handle.await {
            Ok(status) => Ok(status),
            Err(e) => {
                error!("Conversion task ended abnormally: {}", e);
                if self.is_loading() {
                    self.finish_failure(ConversionFailure::network(
                        "conversion ended unexpectedly",
                    ));
                }
                Err(Doc2MdError::Internal(format!("conversion task failed: {e}")))
            }
        }
    }

    /// Copy the current Markdown to the clipboard.
    ///
    /// Clipboard failures are swallowed: the outcome is reported to the
    /// caller but never shown in the session.
    pub async fn copy_result(&self) -> CopyOutcome {
        let markdown = self.markdown();
        if markdown.is_empty() {
            return CopyOutcome::Skipped;
        }

        match self.inner.clipboard.write_text(&markdown).await {
            Ok(()) => {
                let mut epoch = 0;
                self.inner.state.send_modify(|s| {
                    s.copy_feedback_active = true;
                    s.copy_epoch += 1;
                    epoch = s.copy_epoch;
                });
                let weak = Arc::downgrade(&self.inner);
                self.inner
                    .copy_clear
                    .schedule(self.inner.config.copy_feedback, move || {
                        clear_copy_feedback(&weak, epoch)
                    });
                debug!("Copied {} bytes to the clipboard", markdown.len());
                CopyOutcome::Copied
            }
            Err(e) => {
                debug!("Clipboard write failed: {}", e);
                self.inner.copy_clear.cancel();
                self.inner.state.send_if_modified(|s| {
                    let changed = s.copy_feedback_active;
                    s.copy_feedback_active = false;
                    changed
                });
                CopyOutcome::Failed
            }
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────

    /// Check preconditions and enter `Submitting` in one step.
    fn begin_submit(&self) -> Result<UploadFile, Doc2MdError> {
        let mut outcome = Err(Doc2MdError::NoFileSelected);
        self.inner.state.send_if_modified(|s| {
            if !s.status.can_submit() {
                outcome = Err(Doc2MdError::SubmissionInProgress);
                return false;
            }
            match s.selected_file {
                Some(ref file) => {
                    outcome = Ok(file.clone());
                    s.status = Status::Submitting;
                    true
                }
                None => false,
            }
        });
        if let Err(ref e) = outcome {
            warn!("Submit rejected: {}", e);
        }
        outcome
    }

    /// The request and its outcome; runs detached from the caller.
    async fn run_submission(&self, file: UploadFile) -> Status {
        let start = Instant::now();

        info!("Converting '{}' ({} bytes)", file.name, file.len());
        if let Some(ref cb) = self.inner.config.progress_callback {
            cb.on_submit_start(&file.name, file.len());
        }

        let result = self.inner.transport.convert(&file).await;
        let elapsed_ms = start.elapsed().as_millis();

        match result {
            Ok(markdown) => {
                info!(
                    "Converted '{}': {} bytes of Markdown in {}ms",
                    file.name,
                    markdown.len(),
                    elapsed_ms
                );
                let len = markdown.len();
                self.finish_success(markdown);
                if let Some(ref cb) = self.inner.config.progress_callback {
                    cb.on_submit_complete(&file.name, len);
                }
                Status::Succeeded
            }
            Err(failure) => {
                error!(
                    "Conversion of '{}' failed after {}ms: {:?}",
                    file.name, elapsed_ms, failure
                );
                let message = failure.to_string();
                self.finish_failure(failure);
                if let Some(ref cb) = self.inner.config.progress_callback {
                    cb.on_submit_error(&file.name, &message);
                }
                Status::Failed
            }
        }
    }

    fn finish_success(&self, markdown: String) {
        self.inner.error_clear.cancel();
        self.inner.state.send_modify(|s| {
            s.markdown = markdown;
            s.error_message.clear();
            s.last_failure = None;
            s.error_epoch += 1;
            s.status = Status::Succeeded;
        });
    }

    fn finish_failure(&self, failure: ConversionFailure) {
        let message = failure.to_string();
        let mut epoch = 0;
        self.inner.state.send_modify(|s| {
            s.error_message = message;
            s.last_failure = Some(failure);
            s.error_epoch += 1;
            epoch = s.error_epoch;
            s.status = Status::Failed;
        });
        let weak = Arc::downgrade(&self.inner);
        self.inner
            .error_clear
            .schedule(self.inner.config.error_display, move || {
                clear_error(&weak, epoch)
            });
    }
}

fn clear_error(inner: &Weak<Inner>, epoch: u64) {
    if let Some(inner) = inner.upgrade() {
        inner.state.send_if_modified(|s| {
            if s.error_epoch != epoch || s.error_message.is_empty() {
                return false;
            }
            s.error_message.clear();
            true
        });
    }
}

fn clear_copy_feedback(inner: &Weak<Inner>, epoch: u64) {
    if let Some(inner) = inner.upgrade() {
        inner.state.send_if_modified(|s| {
            if s.copy_epoch != epoch || !s.copy_feedback_active {
                return false;
            }
            s.copy_feedback_active = false;
            true
        });
    }
}
