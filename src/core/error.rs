//! Gateway error taxonomy and the wire-level error envelope.
//!
//! Every failure a request can surface is one of the variants below. The
//! `IntoResponse` impl is the error reporter: it picks the HTTP status, logs
//! the full internal cause, and serializes an [`ErrorEnvelope`] — converter
//! causes stay server-side, validation messages go to the client verbatim.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::domains::convert::ConvertError;

/// A specialized Result type for gateway request handling.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Unified error type for the conversion gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The requested tool is not in the registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A field the tool requires was absent from the payload.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// The body could not be parsed per its declared content type.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// The payload exceeded the configured upload ceiling.
    #[error("Payload exceeds the {limit_bytes} byte upload limit")]
    PayloadTooLarge { limit_bytes: usize },

    /// The converter itself failed. The display string is the generic
    /// client-facing message; the cause is preserved for server-side logging.
    #[error("An error occurred during {tool}.")]
    ConversionFailed {
        tool: &'static str,
        #[source]
        source: ConvertError,
    },
}

impl GatewayError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(id: impl Into<String>) -> Self {
        Self::UnknownTool(id.into())
    }

    /// Create a new "missing field" error.
    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::MissingField(name.into())
    }

    /// Create a new "malformed body" error.
    pub fn malformed_body(msg: impl Into<String>) -> Self {
        Self::MalformedBody(msg.into())
    }

    /// The HTTP status this failure maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownTool(_) => StatusCode::NOT_FOUND,
            Self::MissingField(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ConversionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            GatewayError::ConversionFailed { tool, source } => {
                // Full cause chain stays in the server log only.
                error!(tool, cause = %source, "conversion failed");
            }
            other => {
                warn!(reason = %other, "request rejected");
            }
        }

        let envelope = ErrorEnvelope::new(self.to_string());
        (self.status(), Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::unknown_tool("nope").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::missing_field("files").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::malformed_body("bad boundary").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::PayloadTooLarge { limit_bytes: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            GatewayError::ConversionFailed {
                tool: "PDF Merge",
                source: ConvertError::invalid_input("not a pdf"),
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conversion_failure_message_is_generic() {
        let err = GatewayError::ConversionFailed {
            tool: "PDF to Word",
            source: ConvertError::invalid_input("stack detail the client must not see"),
        };
        let message = err.to_string();
        assert_eq!(message, "An error occurred during PDF to Word.");
        assert!(!message.contains("stack detail"));
    }

    #[test]
    fn test_envelope_omits_absent_details() {
        let json = serde_json::to_string(&ErrorEnvelope::new("boom")).unwrap();
        assert_eq!(json, r#"{"message":"boom"}"#);

        let parsed: ErrorEnvelope =
            serde_json::from_str(r#"{"message":"boom","details":"cause"}"#).unwrap();
        assert_eq!(parsed.details.as_deref(), Some("cause"));
    }
}
