//! Client half of the gateway.
//!
//! Resolves tools through the same [`ToolRegistry`] the server routes from,
//! posts the payload as multipart form data, and treats the response as an
//! opaque binary blob: the local filename comes from the descriptor, never
//! from server-supplied metadata. Failures are decoded from the
//! [`ErrorEnvelope`] body when one is present, with a fallback message
//! derived from the HTTP status.

mod download;
mod progress;

pub use download::DownloadHandle;
pub use progress::{ProgressScope, ProgressSink, SilentProgress, TracingProgress};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::core::error::ErrorEnvelope;
use crate::domains::convert::ToolRegistry;

/// Errors surfaced to the end user of the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The tool identifier is not in the shared registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The request never completed (connection refused, timeout, ...).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("{message}")]
    Gateway { status: StatusCode, message: String },

    /// Saving the artifact failed.
    #[error("could not save artifact: {0}")]
    Save(#[from] std::io::Error),
}

/// Input payload for one conversion call.
#[derive(Debug, Default)]
pub struct ConversionInput {
    files: Vec<(String, String, Vec<u8>)>,
    text: Vec<(String, String)>,
}

impl ConversionInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a file under `field`.
    pub fn file(
        mut self,
        field: impl Into<String>,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push((field.into(), filename.into(), bytes));
        self
    }

    /// Attach a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text.push((name.into(), value.into()));
        self
    }
}

/// HTTP client for the conversion gateway.
pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
    progress: Arc<dyn ProgressSink>,
}

impl GatewayClient {
    /// Create a client targeting `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            progress: Arc::new(SilentProgress),
        }
    }

    /// Create a client from `DOCGATE_BASE_URL` (falling back to the default
    /// config's base URL).
    pub fn from_env() -> Self {
        Self::new(crate::core::Config::from_env().http.base_url)
    }

    /// Replace the progress sink.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Run `tool_id` over `input` and return the artifact bytes.
    pub async fn convert(&self, tool_id: &str, input: ConversionInput) -> Result<Vec<u8>, ClientError> {
        let descriptor = ToolRegistry::resolve(tool_id)
            .map_err(|_| ClientError::UnknownTool(tool_id.to_string()))?;

        let _scope = ProgressScope::enter(&*self.progress, descriptor.label);

        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            descriptor.endpoint_path
        );

        let mut form = Form::new();
        for (field, filename, bytes) in input.files {
            form = form.part(field, Part::bytes(bytes).file_name(filename));
        }
        for (name, value) in input.text {
            form = form.text(name, value);
        }

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ClientError::Gateway {
                status,
                message: error_message(status, &body),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Run `tool_id` over `input` and save the artifact into `dir` under the
    /// descriptor's output filename. Returns the path written.
    pub async fn convert_to_file(
        &self,
        tool_id: &str,
        input: ConversionInput,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, ClientError> {
        let descriptor = ToolRegistry::resolve(tool_id)
            .map_err(|_| ClientError::UnknownTool(tool_id.to_string()))?;

        let bytes = self.convert(tool_id, input).await?;

        let handle = DownloadHandle::create_in(dir)?;
        Ok(handle.commit(&bytes, descriptor.output_filename)?)
    }
}

/// Derive the user-facing message for a failed response: the envelope's
/// message when the body parses as one, otherwise a generic line built from
/// the HTTP status.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.message,
        Err(_) => format!(
            "Server error: {}",
            status.canonical_reason().unwrap_or("unknown status")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_is_rejected_before_any_request() {
        let client = GatewayClient::new("http://127.0.0.1:1");
        let err = futures::executor::block_on(
            client.convert("pdf-to-morse", ConversionInput::new()),
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::UnknownTool(_)));
    }

    #[test]
    fn test_error_message_prefers_the_envelope() {
        let body = br#"{"message":"Missing required field: 'text' (text)"}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "Missing required field: 'text' (text)"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status_text() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"<html>nginx</html>"),
            "Server error: Bad Gateway"
        );
    }

    #[test]
    fn test_input_builder_collects_parts() {
        let input = ConversionInput::new()
            .file("files", "a.pdf", vec![1, 2])
            .file("files", "b.pdf", vec![3])
            .text("width", "640");
        assert_eq!(input.files.len(), 2);
        assert_eq!(input.text.len(), 1);
    }
}
