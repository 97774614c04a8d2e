//! Converter-internal error types.
//!
//! These never reach the client directly: the dispatcher wraps them in
//! `GatewayError::ConversionFailed`, which logs the full cause server-side and
//! reports a generic per-tool message.

use thiserror::Error;

/// Errors that can occur inside a converter.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// PDF parsing or serialization failed.
    #[error("PDF processing failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Image decoding or encoding failed.
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    /// QR encoding failed (input too long for any QR version).
    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),

    /// Packaging the .docx archive failed.
    #[error("document packaging failed: {0}")]
    Docx(#[from] docx_rs::DocxError),

    /// Zipping the .docx archive failed.
    #[error("archive packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writing the converted output buffer failed.
    #[error("output serialization failed: {0}")]
    Io(#[from] std::io::Error),

    /// The payload was structurally valid but unusable for this tool.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The conversion task itself failed (worker panic or cancellation).
    #[error("conversion task failed: {0}")]
    Task(String),
}

impl ConvertError {
    /// Create a new "invalid input" error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new task-failure error.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }
}
