//! PDF to Word converter.
//!
//! Extracts the text content of every page and emits a .docx with one
//! paragraph per source line. Layout, fonts, and images are not carried over;
//! this is a text conversion, matching what the extraction layer can see.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};
use lopdf::Document;
use tracing::debug;

use super::super::error::ConvertError;
use super::super::payload::{ConversionRequest, ConversionResult, FieldSpec, ToolDescriptor};

const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// PDF to Word tool.
pub struct PdfToWordTool;

impl PdfToWordTool {
    pub const NAME: &'static str = "pdf-to-word";
    pub const LABEL: &'static str = "PDF to Word";
    pub const ENDPOINT: &'static str = "/api/pdf-to-word";
    pub const OUTPUT_FILENAME: &'static str = "converted.docx";

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

        let document = Document::load_mem(&upload.bytes)?;
        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        let text = document.extract_text(&pages)?;

        debug!(
            pages = pages.len(),
            extracted_chars = text.len(),
            "text extracted"
        );

        let mut docx = Docx::new();
        for line in text.lines() {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer)?;

        Ok(ConversionResult::new(
            buffer.into_inner(),
            DOCX_MIME,
            Self::OUTPUT_FILENAME,
        ))
    }
}
