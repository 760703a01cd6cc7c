//! The file handed to the conversion endpoint.
//!
//! An [`UploadFile`] is fully buffered in memory: the endpoint takes one
//! multipart part and the service only accepts single documents, so there
//! is nothing to gain from streaming the body.

use crate::config::ACCEPTED_EXTENSIONS;
use crate::error::Doc2MdError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A selected file: name, MIME type and bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

impl UploadFile {
    /// Build a file from in-memory bytes; the MIME type is guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = guess_mime(&name);
        Self {
            name,
            mime_type,
            bytes,
        }
    }

    /// Override the guessed MIME type.
    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = mime.into();
        self
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Doc2MdError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| read_error(path.to_path_buf(), e))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        debug!("Read {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::from_bytes(name, bytes))
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the file picker would have offered this file.
    pub fn is_accepted(&self) -> bool {
        is_accepted_name(&self.name)
    }

    /// Name, type and size without the bytes.
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            size: self.bytes.len(),
        }
    }
}

/// What the page shows about the selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub mime_type: String,
    pub size: usize,
}

/// Check a file name against the picker's accept list (case-insensitive).
pub fn is_accepted_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// The picker's `accept` attribute, e.g. `.pdf, .png, .jpg, .jpeg`.
pub fn accept_hint() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn guess_mime(name: &str) -> String {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

fn read_error(path: PathBuf, e: std::io::Error) -> Doc2MdError {
    match e.kind() {
        std::io::ErrorKind::NotFound => Doc2MdError::FileNotFound { path },
        std::io::ErrorKind::PermissionDenied => Doc2MdError::PermissionDenied { path },
        _ => Doc2MdError::ReadFailed { path, source: e },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_accepted_extensions() {
        assert!(is_accepted_name("report.pdf"));
        assert!(is_accepted_name("scan.PNG"));
        assert!(is_accepted_name("photo.jpg"));
        assert!(is_accepted_name("photo.JPEG"));
        assert!(!is_accepted_name("notes.docx"));
        assert!(!is_accepted_name("README"));
        assert!(!is_accepted_name(""));
    }

    #[test]
    fn test_accept_hint() {
        assert_eq!(accept_hint(), ".pdf, .png, .jpg, .jpeg");
    }

    #[test]
    fn test_mime_guess() {
        assert_eq!(UploadFile::from_bytes("a.pdf", vec![]).mime_type, "application/pdf");
        assert_eq!(UploadFile::from_bytes("a.png", vec![]).mime_type, "image/png");
        assert_eq!(UploadFile::from_bytes("a.jpg", vec![]).mime_type, "image/jpeg");
        assert_eq!(
            UploadFile::from_bytes("a", vec![]).mime_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_debug_hides_bytes() {
        let f = UploadFile::from_bytes("a.pdf", vec![0u8; 2048]);
        let dbg = format!("{f:?}");
        assert!(dbg.contains("<2048 bytes>"), "got: {dbg}");
    }

    #[test]
    fn test_from_path_reads_bytes_and_name() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.7 test").unwrap();

        let file = tokio_test::block_on(UploadFile::from_path(tmp.path())).unwrap();
        assert_eq!(file.bytes, b"%PDF-1.7 test");
        assert!(file.name.ends_with(".pdf"));
        assert_eq!(file.mime_type, "application/pdf");
        assert!(file.is_accepted());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = tokio_test::block_on(UploadFile::from_path("/definitely/not/here.pdf"))
            .unwrap_err();
        assert!(matches!(err, Doc2MdError::FileNotFound { .. }), "got: {err:?}");
    }

    #[test]
    fn test_summary_drops_bytes() {
        let s = UploadFile::from_bytes("x.png", vec![1, 2, 3]).summary();
        assert_eq!(s.name, "x.png");
        assert_eq!(s.size, 3);
    }
}
