//! Tool registry — central descriptor table and converter dispatch.
//!
//! The table below is the single source of truth for tool identifiers,
//! endpoint paths, and output filenames. The server builds its routes from it
//! and the client resolves endpoints and local filenames through it, so the
//! two halves cannot drift apart.

use tracing::warn;

use super::converters::{
    CompressPdfTool, ImageResizeTool, MergePdfTool, PdfToWordTool, QrCodeTool,
};
use super::payload::{ConversionRequest, ConversionResult, ToolDescriptor};
use super::receiver;
use crate::core::error::GatewayError;

/// Every registered tool, in the order routes are mounted.
pub const DESCRIPTORS: &[ToolDescriptor] = &[
    QrCodeTool::DESCRIPTOR,
    MergePdfTool::DESCRIPTOR,
    CompressPdfTool::DESCRIPTOR,
    PdfToWordTool::DESCRIPTOR,
    ImageResizeTool::DESCRIPTOR,
];

/// Tool registry — resolves identifiers and dispatches conversions.
pub struct ToolRegistry;

impl ToolRegistry {
    /// All registered descriptors.
    pub fn descriptors() -> &'static [ToolDescriptor] {
        DESCRIPTORS
    }

    /// Resolve a tool identifier to its descriptor.
    pub fn resolve(tool_id: &str) -> Result<&'static ToolDescriptor, GatewayError> {
        DESCRIPTORS
            .iter()
            .find(|descriptor| descriptor.id == tool_id)
            .ok_or_else(|| GatewayError::unknown_tool(tool_id))
    }

    /// Validate the payload against the tool's expected fields, then invoke
    /// the matching converter. Field validation happens first, so a payload
    /// missing a required field never reaches converter code.
    pub fn dispatch(
        tool_id: &str,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, GatewayError> {
        let descriptor = Self::resolve(tool_id)?;
        receiver::ensure_required_fields(descriptor, request)?;

        let converted = match descriptor.id {
            QrCodeTool::NAME => QrCodeTool::convert(request),
            MergePdfTool::NAME => MergePdfTool::convert(request),
            CompressPdfTool::NAME => CompressPdfTool::convert(request),
            PdfToWordTool::NAME => PdfToWordTool::convert(request),
            ImageResizeTool::NAME => ImageResizeTool::convert(request),
            other => {
                warn!(tool = other, "descriptor registered without a converter arm");
                return Err(GatewayError::unknown_tool(other));
            }
        };

        converted.map_err(|source| GatewayError::ConversionFailed {
            tool: descriptor.label,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resolves_every_registered_tool() {
        for descriptor in ToolRegistry::descriptors() {
            let resolved = ToolRegistry::resolve(descriptor.id).unwrap();
            assert_eq!(resolved.endpoint_path, descriptor.endpoint_path);
        }
    }

    #[test]
    fn test_unknown_tool_fails_resolution() {
        let err = ToolRegistry::resolve("pdf-to-morse").unwrap_err();
        assert!(matches!(err, GatewayError::UnknownTool(_)));
    }

    #[test]
    fn test_ids_and_endpoints_are_unique() {
        let ids: HashSet<_> = DESCRIPTORS.iter().map(|d| d.id).collect();
        let endpoints: HashSet<_> = DESCRIPTORS.iter().map(|d| d.endpoint_path).collect();
        assert_eq!(ids.len(), DESCRIPTORS.len());
        assert_eq!(endpoints.len(), DESCRIPTORS.len());
    }

    #[test]
    fn test_every_endpoint_is_under_api() {
        for descriptor in DESCRIPTORS {
            assert!(
                descriptor.endpoint_path.starts_with("/api/"),
                "{} is not under /api/",
                descriptor.id
            );
        }
    }

    #[test]
    fn test_dispatch_validates_fields_before_converting() {
        // No `text` field: the QR converter must never run.
        let err = ToolRegistry::dispatch(QrCodeTool::NAME, &ConversionRequest::new()).unwrap_err();
        assert!(matches!(err, GatewayError::MissingField(_)));
    }

    #[test]
    fn test_dispatch_runs_the_converter() {
        let mut request = ConversionRequest::new();
        request.set_text("text", "hello");
        let result = ToolRegistry::dispatch(QrCodeTool::NAME, &request).unwrap();
        assert_eq!(result.content_type, "image/png");
        assert!(!result.bytes.is_empty());
    }

    #[test]
    fn test_dispatch_wraps_converter_failures() {
        let mut request = ConversionRequest::new();
        request.push_file(
            "files",
            Some("broken.pdf".into()),
            bytes::Bytes::from_static(b"not a pdf"),
        );
        let err = ToolRegistry::dispatch(CompressPdfTool::NAME, &request).unwrap_err();
        match err {
            GatewayError::ConversionFailed { tool, .. } => {
                assert_eq!(tool, CompressPdfTool::LABEL);
            }
            other => panic!("expected ConversionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_same_input_twice_yields_same_content_type() {
        let mut request = ConversionRequest::new();
        request.set_text("text", "idempotent");
        let first = ToolRegistry::dispatch(QrCodeTool::NAME, &request).unwrap();
        let second = ToolRegistry::dispatch(QrCodeTool::NAME, &request).unwrap();
        assert_eq!(first.content_type, second.content_type);
    }
}
