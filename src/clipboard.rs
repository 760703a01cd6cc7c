//! Clipboard access for the copy control.
//!
//! Copy failures never reach the user, so implementations only need to say
//! whether the text landed. [`SystemClipboard`] writes to the OS clipboard
//! (feature `system-clipboard`); [`UnavailableClipboard`] always refuses and
//! is what headless builds get.

use crate::error::ClipboardError;
use async_trait::async_trait;

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The operating-system clipboard via `arboard`.
///
/// `arboard` is blocking, so every write runs on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    #[cfg(feature = "system-clipboard")]
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Rejected(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::Rejected(e.to_string()))
        })
        .await
        .map_err(|e| ClipboardError::Rejected(e.to_string()))?
    }

    #[cfg(not(feature = "system-clipboard"))]
    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// A clipboard that is never there.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClipboard;

#[async_trait]
impl Clipboard for UnavailableClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_clipboard_refuses() {
        let err = UnavailableClipboard.write_text("x").await.unwrap_err();
        assert_eq!(err, ClipboardError::Unavailable);
    }

    #[test]
    fn clipboards_are_object_safe() {
        let _boxed: Box<dyn Clipboard> = Box::new(SystemClipboard);
        let _boxed: Box<dyn Clipboard> = Box::new(UnavailableClipboard);
    }
}
