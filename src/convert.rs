//! One-shot conversion entry points.
//!
//! These wrap a throwaway [`ConversionController`] for callers that just
//! want Markdown back: read the file, submit it once, and turn a `Failed`
//! session into [`Doc2MdError::Conversion`]. Use the controller directly
//! when you need the session (error banner timing, copy feedback, streams).

use crate::clipboard::UnavailableClipboard;
use crate::config::ClientConfig;
use crate::controller::ConversionController;
use crate::error::{ConversionFailure, Doc2MdError};
use crate::session::Status;
use crate::transport::HttpTransport;
use crate::upload::UploadFile;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Convert a PDF or image file to Markdown.
///
/// # Errors
/// - File not found / permission denied / unreadable
/// - [`Doc2MdError::Conversion`] when the endpoint did not return Markdown
pub async fn convert(
    path: impl AsRef<Path>,
    config: &ClientConfig,
) -> Result<String, Doc2MdError> {
    let file = UploadFile::from_path(path).await?;
    convert_file(file, config).await
}

/// Convert an in-memory file to Markdown.
pub async fn convert_file(file: UploadFile, config: &ClientConfig) -> Result<String, Doc2MdError> {
    let transport = HttpTransport::new(config)?;
    let controller = ConversionController::new(
        config.clone(),
        Arc::new(transport),
        Arc::new(UnavailableClipboard),
    );
    finish(&controller, file).await
}

/// Convert a file and write the Markdown to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
/// Returns the number of bytes written.
pub async fn convert_to_file(
    path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ClientConfig,
) -> Result<usize, Doc2MdError> {
    let markdown = convert(path, config).await?;
    write_markdown(output_path.as_ref(), &markdown).await?;
    Ok(markdown.len())
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(path: impl AsRef<Path>, config: &ClientConfig) -> Result<String, Doc2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Doc2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(path, config))
}

/// Write Markdown to `path` exactly as given, atomically.
pub async fn write_markdown(path: &Path, markdown: &str) -> Result<(), Doc2MdError> {
    let write_err = |e| Doc2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, markdown)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    info!("Wrote {} bytes to {}", markdown.len(), path.display());
    Ok(())
}

async fn finish(controller: &ConversionController, file: UploadFile) -> Result<String, Doc2MdError> {
    match controller.submit_file(file).await? {
        Status::Succeeded => Ok(controller.markdown()),
        _ => {
            let failure = controller
                .last_failure()
                .unwrap_or_else(|| ConversionFailure::network(controller.error_message()));
            Err(Doc2MdError::Conversion(failure))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_markdown_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.md");
        let md = "# T\n\nno trailing newline";

        write_markdown(&path, md).await.unwrap();

        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), md);
        assert!(!path.with_extension("md.tmp").exists());
    }
}
