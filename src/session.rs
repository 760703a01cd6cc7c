//! The state of one page view.
//!
//! A [`ConversionSession`] is owned by the controller and published through a
//! `tokio::sync::watch` channel; observers only ever see clones or
//! [`SessionSnapshot`]s.

use crate::error::ConversionFailure;
use crate::upload::{FileSummary, UploadFile};
use serde::Serialize;

/// Phase of the submission state machine.
///
/// Transitions are `Idle | Succeeded | Failed → Submitting → Succeeded | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl Status {
    /// Whether `submit` may start from this phase.
    pub fn can_submit(self) -> bool {
        !matches!(self, Status::Submitting)
    }
}

/// In-memory state of one page view.
#[derive(Debug, Clone, Default)]
pub struct ConversionSession {
    pub selected_file: Option<UploadFile>,
    pub status: Status,
    /// Last successful result. Kept across a later failure.
    pub markdown: String,
    /// Banner text of the last failure; empty when nothing to show.
    pub error_message: String,
    /// Why the last submission failed. Outlives the banner text.
    pub last_failure: Option<ConversionFailure>,
    pub copy_feedback_active: bool,

    // Bumped whenever the matching field is set, so a late timer can tell
    // whether the value it was scheduled for is still current.
    pub(crate) error_epoch: u64,
    pub(crate) copy_epoch: u64,
}

impl ConversionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Submitting
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            markdown: self.markdown.clone(),
            error_message: self.error_message.clone(),
            copy_feedback_active: self.copy_feedback_active,
            selected_file: self.selected_file.as_ref().map(UploadFile::summary),
        }
    }
}

/// A serialisable, byte-free view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub status: Status,
    pub markdown: String,
    pub error_message: String,
    pub copy_feedback_active: bool,
    pub selected_file: Option<FileSummary>,
}

impl SessionSnapshot {
    pub fn is_loading(&self) -> bool {
        self.status == Status::Submitting
    }
}
