//! Payload types shared by the receiver, the dispatcher, and the client.
//!
//! Everything here is request-scoped: a [`ConversionRequest`] is built when the
//! HTTP body finishes parsing and dropped when the handler returns. Only the
//! [`ToolDescriptor`] table outlives a request, and it is `'static`.

use bytes::Bytes;
use std::collections::HashMap;

// ============================================================================
// Field specifications
// ============================================================================

/// The kind of multipart/form part a tool expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A file upload (a part carrying a filename).
    File,
    /// A plain text value.
    Text,
}

/// Describes one part of a tool's expected submission.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    /// A required file field.
    pub const fn file(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::File,
            required: true,
        }
    }

    /// A required text field.
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: true,
        }
    }

    /// An optional text field.
    pub const fn optional_text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
        }
    }
}

// ============================================================================
// Tool descriptors
// ============================================================================

/// Static description of one conversion tool.
///
/// The descriptor table is the single source of truth shared by the server
/// router and the client: the server derives its routes from `endpoint_path`,
/// the client derives the request URL and the local filename for the saved
/// artifact from the same entry.
#[derive(Debug, Clone, Copy)]
pub struct ToolDescriptor {
    /// Stable identifier, e.g. `"pdf-to-word"`.
    pub id: &'static str,
    /// Human-readable name used in the generic failure message.
    pub label: &'static str,
    /// Route the server exposes and the client posts to.
    pub endpoint_path: &'static str,
    /// Filename the client saves the artifact under.
    pub output_filename: &'static str,
    /// The parts a submission to this tool may carry.
    pub expected_fields: &'static [FieldSpec],
}

// ============================================================================
// Conversion request
// ============================================================================

/// One uploaded file, held fully in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Form field the file arrived under.
    pub field: String,
    /// Client-supplied filename, if any.
    pub filename: Option<String>,
    pub bytes: Bytes,
}

/// The parsed payload of a single conversion call.
///
/// File fields may repeat (the merge tool accepts several parts named
/// `files`), so files are kept as a list and filtered by field name.
#[derive(Debug, Default)]
pub struct ConversionRequest {
    files: Vec<UploadedFile>,
    text: HashMap<String, String>,
}

impl ConversionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_file(&mut self, field: impl Into<String>, filename: Option<String>, bytes: Bytes) {
        self.files.push(UploadedFile {
            field: field.into(),
            filename,
            bytes,
        });
    }

    pub fn set_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.text.insert(name.into(), value.into());
    }

    /// First file uploaded under `field`, if any.
    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == field)
    }

    /// All files uploaded under `field`, in arrival order.
    pub fn files(&self, field: &str) -> Vec<&UploadedFile> {
        self.files.iter().filter(|f| f.field == field).collect()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str)
    }

    /// Whether the payload satisfies `spec` (by name and kind).
    pub fn has_field(&self, spec: &FieldSpec) -> bool {
        match spec.kind {
            FieldKind::File => self.file(spec.name).is_some(),
            FieldKind::Text => self
                .text(spec.name)
                .is_some_and(|value| !value.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.text.is_empty()
    }
}

// ============================================================================
// Conversion result
// ============================================================================

/// The artifact produced by a converter, consumed immediately by delivery.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub suggested_filename: &'static str,
}

impl ConversionResult {
    pub fn new(bytes: Vec<u8>, content_type: &'static str, suggested_filename: &'static str) -> Self {
        Self {
            bytes,
            content_type,
            suggested_filename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_file_fields() {
        let mut request = ConversionRequest::new();
        request.push_file("files", Some("a.pdf".into()), Bytes::from_static(b"a"));
        request.push_file("files", Some("b.pdf".into()), Bytes::from_static(b"b"));
        request.push_file("cover", None, Bytes::from_static(b"c"));

        assert_eq!(request.files("files").len(), 2);
        assert_eq!(request.file("files").unwrap().filename.as_deref(), Some("a.pdf"));
        assert_eq!(request.files("cover").len(), 1);
        assert!(request.files("missing").is_empty());
    }

    #[test]
    fn test_has_field_by_kind() {
        let mut request = ConversionRequest::new();
        request.set_text("text", "hello");
        request.push_file("files", Some("a.pdf".into()), Bytes::from_static(b"a"));

        assert!(request.has_field(&FieldSpec::text("text")));
        assert!(request.has_field(&FieldSpec::file("files")));
        // A text field does not satisfy a file spec of the same name.
        assert!(!request.has_field(&FieldSpec::file("text")));
        assert!(!request.has_field(&FieldSpec::text("missing")));
    }

    #[test]
    fn test_empty_text_does_not_satisfy_required_field() {
        let mut request = ConversionRequest::new();
        request.set_text("text", "");
        assert!(!request.has_field(&FieldSpec::text("text")));
    }
}
