//! Error types for the doc2md library.
//!
//! Three distinct error types reflect three distinct failure modes:
//!
//! * [`Doc2MdError`] (**fatal**): the operation could not even start (file
//!   missing, no file selected, a submission already in flight, bad config).
//!   Returned as `Err(Doc2MdError)`.
//!
//! * [`ConversionFailure`] (**absorbed**): the request was sent but the
//!   conversion did not produce Markdown (non-2xx, transport failure,
//!   unreadable body). The controller records its message in the session's
//!   error banner instead of propagating it.
//!
//! * [`ClipboardError`] (**silent**): the clipboard rejected a copy. The
//!   controller swallows it; the copy feedback simply never appears.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown for any non-2xx response from the conversion endpoint.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload file";

/// All fatal errors returned by the doc2md library.
#[derive(Debug, Error)]
pub enum Doc2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Session errors ────────────────────────────────────────────────────
    /// `submit` was called before a file was selected.
    #[error("No file selected.\nChoose a PDF or image file before converting.")]
    NoFileSelected,

    /// `submit` was called while another conversion is still in flight.
    #[error("A conversion is already in progress; wait for it to finish.")]
    SubmissionInProgress,

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The conversion request completed without producing Markdown.
    ///
    /// Only returned by the one-shot [`crate::convert::convert`] helpers;
    /// the controller keeps these in session state.
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionFailure),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a submitted conversion did not yield Markdown.
///
/// The `Display` text is exactly what the session's error banner shows, so
/// `Network` and `Parse` print the underlying message with no prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ConversionFailure {
    /// The endpoint answered with a non-2xx status.
    #[error("{}", UPLOAD_FAILED_MESSAGE)]
    Upload,

    /// The request never completed (DNS, refused connection, reset, timeout).
    #[error("{message}")]
    Network { message: String },

    /// A 2xx response whose body was not JSON or had no `markdown` string.
    #[error("{message}")]
    Parse { message: String },
}

impl ConversionFailure {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ConversionFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::parse(e.to_string())
        } else {
            Self::network(e.to_string())
        }
    }
}

/// A clipboard write that did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// No clipboard is available in this environment.
    #[error("clipboard is not available")]
    Unavailable,

    /// The clipboard refused the text.
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_failure_display() {
        assert_eq!(ConversionFailure::Upload.to_string(), "Failed to upload file");
    }

    #[test]
    fn network_failure_shows_bare_message() {
        let e = ConversionFailure::network("timeout");
        assert_eq!(e.to_string(), "timeout");
    }

    #[test]
    fn network_failure_may_be_empty() {
        assert_eq!(ConversionFailure::network("").to_string(), "");
    }

    #[test]
    fn conversion_wraps_failure() {
        let e: Doc2MdError = ConversionFailure::parse("missing field `markdown`").into();
        assert!(e.to_string().contains("missing field"), "got: {e}");
    }

    #[test]
    fn file_not_found_display() {
        let e = Doc2MdError::FileNotFound {
            path: PathBuf::from("/tmp/nope.pdf"),
        };
        assert!(e.to_string().contains("/tmp/nope.pdf"));
    }

    #[test]
    fn clipboard_rejected_display() {
        let e = ClipboardError::Rejected("no display".into());
        assert!(e.to_string().contains("no display"));
    }
}
