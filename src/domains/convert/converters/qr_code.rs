//! QR code generator.
//!
//! Text-only tool: takes a `text` field, returns a PNG. The only tool that
//! accepts urlencoded and JSON bodies in addition to multipart.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;

use super::super::error::ConvertError;
use super::super::payload::{ConversionRequest, ConversionResult, FieldSpec, ToolDescriptor};

/// QR code generation tool.
pub struct QrCodeTool;

impl QrCodeTool {
    pub const NAME: &'static str = "qr-code";
    pub const LABEL: &'static str = "QR Code Generation";
    pub const ENDPOINT: &'static str = "/api/qr-code";
    pub const OUTPUT_FILENAME: &'static str = "qrcode.png";

    const FIELDS: &'static [FieldSpec] = &[FieldSpec::text("text")];

    pub const DESCRIPTOR: ToolDescriptor = ToolDescriptor {
        id: Self::NAME,
        label: Self::LABEL,
        endpoint_path: Self::ENDPOINT,
        output_filename: Self::OUTPUT_FILENAME,
        expected_fields: Self::FIELDS,
    };

    pub fn convert(request: &ConversionRequest) -> Result<ConversionResult, ConvertError> {
        let text = request
            .text("text")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConvertError::invalid_input("text for the QR code is required"))?;

        let code = QrCode::new(text.as_bytes())?;
        let rendered = code.render::<Luma<u8>>().min_dimensions(256, 256).build();

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(rendered).write_to(&mut png, ImageFormat::Png)?;

        Ok(ConversionResult::new(
            png.into_inner(),
            "image/png",
            Self::OUTPUT_FILENAME,
        ))
    }
}
