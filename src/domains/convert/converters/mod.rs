//! Converter implementations, one file per tool.
//!
//! Each converter exposes `NAME`/`LABEL`/`ENDPOINT`/`OUTPUT_FILENAME` consts,
//! a const `DESCRIPTOR`, and a synchronous
//! `convert(&ConversionRequest) -> Result<ConversionResult, ConvertError>`.
//! Converters never touch HTTP types; the handler layer owns transport.

pub mod compress_pdf;
pub mod image_resize;
pub mod merge_pdf;
pub mod pdf_to_word;
pub mod qr_code;

pub use compress_pdf::CompressPdfTool;
pub use image_resize::ImageResizeTool;
pub use merge_pdf::MergePdfTool;
pub use pdf_to_word::PdfToWordTool;
pub use qr_code::QrCodeTool;

/// Build a minimal one-page PDF containing `text`, for converter tests.
#[cfg(test)]
pub(crate) fn sample_pdf(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content stream"),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize sample pdf");
    bytes
}
