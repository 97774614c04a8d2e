//! Image resize converter.
//!
//! Accepts any format the `image` crate can sniff, resizes to the requested
//! dimensions, and always emits PNG so the output filename stays fixed.
//! Supplying only one of width/height preserves the aspect ratio.

use std::io::Cursor;

use image::{ImageFormat, imageops::FilterType};
use tracing::debug;

use super::super::error::ConvertError;
use super::super::payload::{ConversionRequest, ConversionResult, FieldSpec, ToolDescriptor};

/// Image resize tool.
pub struct ImageResizeTool;

impl ImageResizeTool {
    pub const NAME: &'static str = "image-resize";
    pub const LABEL: &'static str = "Image Resize";
    pub const ENDPOINT: &'static str = "/api/image-resize";
    pub const OUTPUT_FILENAME: &'static str = "resized.png";

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::file("files"),
        FieldSpec::optional_text("width"),
        FieldSpec::optional_text("height"),
    ];

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
            .ok_or_else(|| ConvertError::invalid_input("an image file is required"))?;

        let width = parse_dimension(request.text("width"), "width")?;
        let height = parse_dimension(request.text("height"), "height")?;

        let source = image::load_from_memory(&upload.bytes)?;
        let (target_width, target_height) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, scaled(source.height(), source.width(), w)),
            (None, Some(h)) => (scaled(source.width(), source.height(), h), h),
            (None, None) => {
                return Err(ConvertError::invalid_input(
                    "at least one of width or height is required",
                ));
            }
        };

        debug!(
            from_w = source.width(),
            from_h = source.height(),
            target_width,
            target_height,
            "resizing image"
        );

        let resized = source.resize_exact(target_width, target_height, FilterType::Lanczos3);

        let mut png = Cursor::new(Vec::new());
        resized.write_to(&mut png, ImageFormat::Png)?;

        Ok(ConversionResult::new(
            png.into_inner(),
            "image/png",
            Self::OUTPUT_FILENAME,
        ))
    }
}

/// Parse an optional dimension field into a positive pixel count.
fn parse_dimension(value: Option<&str>, name: &str) -> Result<Option<u32>, ConvertError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => {
            let parsed: u32 = raw.trim().parse().map_err(|_| {
                ConvertError::invalid_input(format!("{name} must be a positive integer, got '{raw}'"))
            })?;
            if parsed == 0 {
                return Err(ConvertError::invalid_input(format!("{name} must be non-zero")));
            }
            Ok(Some(parsed))
        }
    }
}

/// Scale `other` by the same factor that maps `reference` onto `target`.
fn scaled(other: u32, reference: u32, target: u32) -> u32 {
    let ratio = f64::from(target) / f64::from(reference);
    (f64::from(other) * ratio).round().max(1.0) as u32
}
