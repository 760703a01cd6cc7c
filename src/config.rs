//! Configuration for the conversion client.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. The defaults reproduce the hosted Doc2MD page:
//! the public conversion endpoint, a 3 s error banner, a 2 s copy
//! confirmation and no request timeout.

use crate::error::Doc2MdError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The hosted PDF/image → Markdown conversion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://llm.arc53.com/doc2md";

/// File extensions offered by the file picker. A hint, never enforced.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Configuration for a conversion client.
///
/// Built via [`ClientConfig::builder()`] or using [`ClientConfig::default()`].
///
/// # Example
/// ```rust
/// use doc2md::{ClientConfig, Theme};
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .theme(Theme::Dark)
///     .error_display(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// assert_eq!(config.endpoint, doc2md::config::DEFAULT_ENDPOINT);
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Conversion endpoint that receives the multipart POST.
    pub endpoint: String,

    /// How long a failure message stays in the error banner. Default: 3 s.
    pub error_display: Duration,

    /// How long the copy control shows its check mark. Default: 2 s.
    pub copy_feedback: Duration,

    /// Optional whole-request timeout. Default: none.
    ///
    /// Without one a hung endpoint leaves the session `Submitting`
    /// until the transport itself gives up.
    pub request_timeout: Option<Duration>,

    /// Visual variant selector. Default: [`Theme::Light`].
    pub theme: Theme,

    /// Told when each submission starts and how it ends. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            error_display: Duration::from_secs(3),
            copy_feedback: Duration::from_secs(2),
            request_timeout: None,
            theme: Theme::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("error_display", &self.error_display)
            .field("copy_feedback", &self.copy_feedback)
            .field("request_timeout", &self.request_timeout)
            .field("theme", &self.theme)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn SubmitProgressCallback>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn error_display(mut self, d: Duration) -> Self {
        self.config.error_display = d;
        self
    }

    pub fn copy_feedback(mut self, d: Duration) -> Self {
        self.config.copy_feedback = d;
        self
    }

    pub fn request_timeout(mut self, d: Option<Duration>) -> Self {
        self.config.request_timeout = d.filter(|d| !d.is_zero());
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.config.theme = theme;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, Doc2MdError> {
        let c = &self.config;
        let endpoint = c.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Doc2MdError::InvalidConfig(format!(
                "endpoint must be an HTTP/HTTPS URL, got '{}'",
                c.endpoint
            )));
        }
        if reqwest::Url::parse(endpoint).is_err() {
            return Err(Doc2MdError::InvalidConfig(format!(
                "endpoint is not a valid URL: '{}'",
                c.endpoint
            )));
        }
        if c.error_display.is_zero() {
            return Err(Doc2MdError::InvalidConfig(
                "error display window must be > 0".into(),
            ));
        }
        if c.copy_feedback.is_zero() {
            return Err(Doc2MdError::InvalidConfig(
                "copy feedback window must be > 0".into(),
            ));
        }
        let mut config = self.config;
        config.endpoint = config.endpoint.trim().to_string();
        Ok(config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Light or dark page theme. Read-only input to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Submit control styling picked from the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    Default,
    Secondary,
}

impl Theme {
    pub fn button_variant(self) -> ButtonVariant {
        match self {
            Theme::Light => ButtonVariant::Default,
            Theme::Dark => ButtonVariant::Secondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hosted_page() {
        let c = ClientConfig::default();
        assert_eq!(c.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(c.error_display, Duration::from_secs(3));
        assert_eq!(c.copy_feedback, Duration::from_secs(2));
        assert!(c.request_timeout.is_none());
        assert_eq!(c.theme, Theme::Light);
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn debug_names_callback_without_requiring_debug() {
        let c = ClientConfig::builder()
            .progress_callback(std::sync::Arc::new(crate::progress::NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn SubmitProgressCallback>"), "got: {dbg}");
    }

    #[test]
    fn builder_rejects_non_http_endpoint() {
        let err = ClientConfig::builder()
            .endpoint("ftp://example.com/doc2md")
            .build()
            .unwrap_err();
        assert!(matches!(err, Doc2MdError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_zero_windows() {
        assert!(ClientConfig::builder()
            .error_display(Duration::ZERO)
            .build()
            .is_err());
        assert!(ClientConfig::builder()
            .copy_feedback(Duration::ZERO)
            .build()
            .is_err());
    }

    #[test]
    fn zero_timeout_means_none() {
        let c = ClientConfig::builder()
            .request_timeout(Some(Duration::ZERO))
            .build()
            .unwrap();
        assert!(c.request_timeout.is_none());
    }

    #[test]
    fn endpoint_is_trimmed() {
        let c = ClientConfig::builder()
            .endpoint("  http://127.0.0.1:9/doc2md ")
            .build()
            .unwrap();
        assert_eq!(c.endpoint, "http://127.0.0.1:9/doc2md");
    }

    #[test]
    fn theme_picks_button_variant() {
        assert_eq!(Theme::Light.button_variant(), ButtonVariant::Default);
        assert_eq!(Theme::Dark.button_variant(), ButtonVariant::Secondary);
    }
}
