//! PDF merge converter.
//!
//! Appends the pages of every uploaded document, in upload order, to the
//! first one. Pages are deep-cloned object graphs: streams, fonts, and images
//! referenced by a page dictionary are copied into the output document, with
//! the /Parent back-reference patched afterwards to avoid circular cloning.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

use super::super::error::ConvertError;
use super::super::payload::{ConversionRequest, ConversionResult, FieldSpec, ToolDescriptor};

/// PDF merge tool.
pub struct MergePdfTool;

impl MergePdfTool {
    pub const NAME: &'static str = "merge-pdf";
    pub const LABEL: &'static str = "PDF Merge";
    pub const ENDPOINT: &'static str = "/api/merge-pdf";
    pub const OUTPUT_FILENAME: &'static str = "merged.pdf";

    const FIELDS: &'static [FieldSpec] = &[FieldSpec::file("files")];

    pub const DESCRIPTOR: ToolDescriptor = ToolDescriptor {
        id: Self::NAME,
        label: Self::LABEL,
        endpoint_path: Self::ENDPOINT,
        output_filename: Self::OUTPUT_FILENAME,
        expected_fields: Self::FIELDS,
    };

    pub fn convert(request: &ConversionRequest) -> Result<ConversionResult, ConvertError> {
        let uploads = request.files("files");
        if uploads.len() < 2 {
            return Err(ConvertError::invalid_input(
                "merging requires at least two PDF files",
            ));
        }

        let mut merged = Document::load_mem(&uploads[0].bytes)?;

        for upload in &uploads[1..] {
            let source = Document::load_mem(&upload.bytes)?;
            let pages = source.get_pages();
            let mut page_numbers: Vec<u32> = pages.keys().copied().collect();
            page_numbers.sort_unstable();

            for number in page_numbers {
                append_page(&source, &mut merged, pages[&number])?;
            }
        }

        merged.compress();
        let mut output = Vec::new();
        merged.save_to(&mut output)?;

        debug!(
            inputs = uploads.len(),
            output_bytes = output.len(),
            "merge complete"
        );

        Ok(ConversionResult::new(
            output,
            "application/pdf",
            Self::OUTPUT_FILENAME,
        ))
    }
}

/// Clone `page_id` from `source` into `target`, appending it as the last page.
fn append_page(
    source: &Document,
    target: &mut Document,
    page_id: ObjectId,
) -> Result<(), ConvertError> {
    let page_object = source.get_object(page_id)?;
    let cloned = clone_object(source, target, page_object)?;
    let cloned_id = target.add_object(cloned);

    let pages_id = page_tree_root(target)?;

    if let Ok(Object::Dictionary(pages_dict)) = target.get_object_mut(pages_id) {
        if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
            kids.push(Object::Reference(cloned_id));
        }
        if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
            *count += 1;
        }
    }

    if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_id) {
        page_dict.set("Parent", Object::Reference(pages_id));
    }

    Ok(())
}

/// Resolve the target document's /Pages node through its catalog.
fn page_tree_root(target: &Document) -> Result<ObjectId, ConvertError> {
    let catalog = target.catalog()?;
    match catalog.get(b"Pages")? {
        Object::Reference(id) => Ok(*id),
        _ => Err(ConvertError::invalid_input(
            "PDF catalog /Pages entry is not a reference",
        )),
    }
}

/// Deep-clone one object, recursively resolving references. /Parent is skipped
/// (the caller patches it) so the page tree's back-edge cannot recurse.
fn clone_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
) -> Result<Object, ConvertError> {
    match object {
        Object::Dictionary(dict) => Ok(Object::Dictionary(clone_dictionary(source, target, dict)?)),
        Object::Stream(stream) => {
            let dict = clone_dictionary(source, target, &stream.dict)?;
            Ok(Object::Stream(Stream::new(dict, stream.content.clone())))
        }
        Object::Array(items) => {
            let mut cloned = Vec::with_capacity(items.len());
            for item in items {
                cloned.push(clone_object(source, target, item)?);
            }
            Ok(Object::Array(cloned))
        }
        Object::Reference(ref_id) => match source.get_object(*ref_id) {
            Ok(referenced) => {
                let cloned = clone_object(source, target, referenced)?;
                let new_id = target.add_object(cloned);
                Ok(Object::Reference(new_id))
            }
            Err(err) => {
                warn!(?ref_id, %err, "unresolvable reference replaced with Null");
                Ok(Object::Null)
            }
        },
        other => Ok(other.clone()),
    }
}

fn clone_dictionary(
    source: &Document,
    target: &mut Document,
    dict: &Dictionary,
) -> Result<Dictionary, ConvertError> {
    let mut cloned = Dictionary::new();
    for (key, value) in dict.iter() {
        if key == b"Parent" {
            continue;
        }
        cloned.set(key.clone(), clone_object(source, target, value)?);
    }
    Ok(cloned)
}

#[cfg(test)]
mod tests {
    use super::super::sample_pdf;
    use super::*;
    use bytes::Bytes;

    fn merge_request(documents: &[Vec<u8>]) -> ConversionRequest {
        let mut request = ConversionRequest::new();
        for (index, bytes) in documents.iter().enumerate() {
            request.push_file(
                "files",
                Some(format!("doc{index}.pdf")),
                Bytes::from(bytes.clone()),
            );
        }
        request
    }

    #[test]
    fn test_merges_two_single_page_documents() {
        let request = merge_request(&[sample_pdf("first document"), sample_pdf("second document")]);
        let result = MergePdfTool::convert(&request).unwrap();
        assert_eq!(result.content_type, "application/pdf");

        let merged = Document::load_mem(&result.bytes).unwrap();
        assert_eq!(merged.get_pages().len(), 2);
    }

    #[test]
    fn test_merged_document_keeps_both_texts() {
        let request = merge_request(&[sample_pdf("alpha"), sample_pdf("bravo")]);
        let result = MergePdfTool::convert(&request).unwrap();

        let merged = Document::load_mem(&result.bytes).unwrap();
        let pages: Vec<u32> = merged.get_pages().keys().copied().collect();
        let text = merged.extract_text(&pages).unwrap();
        assert!(text.contains("alpha"));
        assert!(text.contains("bravo"));
    }

    #[test]
    fn test_single_file_rejected() {
        let request = merge_request(&[sample_pdf("only one")]);
        let err = MergePdfTool::convert(&request).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidInput(_)));
    }

    #[test]
    fn test_corrupt_input_is_a_pdf_error() {
        let request = merge_request(&[b"not a pdf".to_vec(), b"also not a pdf".to_vec()]);
        let err = MergePdfTool::convert(&request).unwrap_err();
        assert!(matches!(err, ConvertError::Pdf(_)));
    }
}
