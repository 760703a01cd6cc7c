//! The one wire contract: a multipart POST to the conversion endpoint.
//!
//! ```text
//! POST {endpoint}
//! Content-Type: multipart/form-data; boundary=…
//!
//! --…
//! Content-Disposition: form-data; name="file"; filename="report.pdf"
//! Content-Type: application/pdf
//!
//! <bytes>
//! ```
//!
//! A 2xx answer carries a JSON object with a `markdown` string; every other
//! field is ignored. Any non-2xx answer is a generic upload failure.
//!
//! The controller talks to the endpoint through [`ConversionTransport`] so
//! tests and embedders can substitute their own transport.

use crate::config::ClientConfig;
use crate::error::{ConversionFailure, Doc2MdError};
use crate::upload::UploadFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

/// Multipart field name the endpoint reads the document from.
pub const FILE_FIELD: &str = "file";

/// Sends one file and returns the Markdown the service produced.
#[async_trait]
pub trait ConversionTransport: Send + Sync {
    async fn convert(&self, file: &UploadFile) -> Result<String, ConversionFailure>;
}

/// The success body. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    markdown: String,
}

/// [`ConversionTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, Doc2MdError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Doc2MdError::HttpClient(e.to_string()))?;

        Ok(Self::with_client(client, &config.endpoint))
    }

    /// Reuse an existing client (connection pool, proxies, TLS roots).
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ConversionTransport for HttpTransport {
    async fn convert(&self, file: &UploadFile) -> Result<String, ConversionFailure> {
        let form = build_form(file)?;

        debug!(
            "POST {} ({} '{}', {} bytes)",
            self.endpoint,
            file.mime_type,
            file.name,
            file.len()
        );

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!("Conversion endpoint answered HTTP {}", status);
            return Err(ConversionFailure::Upload);
        }

        let body = response.bytes().await?;
        parse_body(&body)
    }
}

fn build_form(file: &UploadFile) -> Result<Form, ConversionFailure> {
    let part = Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| ConversionFailure::network(e.to_string()))?;
    Ok(Form::new().part(FILE_FIELD, part))
}

/// Extract `markdown` from a success body.
fn parse_body(body: &[u8]) -> Result<String, ConversionFailure> {
    serde_json::from_slice::<ConvertResponse>(body)
        .map(|r| r.markdown)
        .map_err(|e| ConversionFailure::parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_body_extracts_markdown() {
        let md = parse_body(br##"{"markdown":"# Title\n\nBody"}"##).unwrap();
        assert_eq!(md, "# Title\n\nBody");
    }

    #[test]
    fn parse_body_ignores_extra_fields() {
        let md = parse_body(br#"{"markdown":"X","pages":3,"model":"m"}"#).unwrap();
        assert_eq!(md, "X");
    }

    #[test]
    fn parse_body_missing_field_is_parse_failure() {
        let err = parse_body(br#"{"text":"X"}"#).unwrap_err();
        assert!(matches!(err, ConversionFailure::Parse { .. }));
        assert!(err.to_string().contains("markdown"), "got: {err}");
    }

    #[test]
    fn parse_body_not_json() {
        let err = parse_body(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, ConversionFailure::Parse { .. }));
    }

    #[test]
    fn new_uses_config_endpoint() {
        let config = ClientConfig::builder()
            .endpoint("http://127.0.0.1:1/convert")
            .build()
            .unwrap();
        let t = HttpTransport::new(&config).unwrap();
        assert_eq!(t.endpoint(), "http://127.0.0.1:1/convert");
    }
}
