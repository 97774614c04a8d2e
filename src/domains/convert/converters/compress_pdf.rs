//! PDF stream compression converter.

use lopdf::Document;
use tracing::debug;

use super::super::error::ConvertError;
use super::super::payload::{ConversionRequest, ConversionResult, FieldSpec, ToolDescriptor};

/// PDF compression tool. Re-serializes the document with its content streams
/// flate-compressed; already-compressed streams pass through unchanged.
pub struct CompressPdfTool;

impl CompressPdfTool {
    pub const NAME: &'static str = "compress-pdf";
    pub const LABEL: &'static str = "PDF Compression";
    pub const ENDPOINT: &'static str = "/api/compress-pdf";
    pub const OUTPUT_FILENAME: &'static str = "compressed.pdf";

    const FIELDS: &'static [FieldSpec] = &[FieldSpec::file("files")];

    pub const DESCRIPTOR: ToolDescriptor = ToolDescriptor {
        id: Self::NAME,
        label: Self::LABEL,
        endpoint_path: Self::ENDPOINT,
        output_filename: Self::OUTPUT_FILENAME,
        expected_fields: Self::FIELDS,
    };

    pub fn convert(request: &ConversionRequest) -> Result<ConversionResult, ConvertError> {
        let upload = request
            .file("files")
            .ok_or_else(|| ConvertError::invalid_input("a PDF file is required"))?;

        let mut document = Document::load_mem(&upload.bytes)?;
        document.compress();

        let mut output = Vec::new();
        document.save_to(&mut output)?;

        debug!(
            input_bytes = upload.bytes.len(),
            output_bytes = output.len(),
            "compression complete"
        );

        Ok(ConversionResult::new(
            output,
            "application/pdf",
            Self::OUTPUT_FILENAME,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::sample_pdf;
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_output_is_a_loadable_pdf() {
        let mut request = ConversionRequest::new();
        request.push_file("files", Some("in.pdf".into()), Bytes::from(sample_pdf("keep me")));

        let result = CompressPdfTool::convert(&request).unwrap();
        assert_eq!(result.content_type, "application/pdf");

        let reloaded = Document::load_mem(&result.bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
        let text = reloaded.extract_text(&[1]).unwrap();
        assert!(text.contains("keep me"));
    }

    #[test]
    fn test_corrupt_input_is_a_pdf_error() {
        let mut request = ConversionRequest::new();
        request.push_file("files", Some("bad.pdf".into()), Bytes::from_static(b"garbage"));

        let err = CompressPdfTool::convert(&request).unwrap_err();
        assert!(matches!(err, ConvertError::Pdf(_)));
    }
}
