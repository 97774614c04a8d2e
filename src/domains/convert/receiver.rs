//! Upload receiver — turns a raw HTTP request into a [`ConversionRequest`].
//!
//! The body is buffered fully in memory under an explicit ceiling and then
//! parsed per its declared content type: multipart/form-data for file tools,
//! urlencoded or JSON for text-only tools. Multipart parts carrying a
//! filename become file buffers; bare parts become text fields.

use axum::{body::to_bytes, extract::Request, http::header};
use bytes::Bytes;

use super::payload::{ConversionRequest, FieldKind, FieldSpec, ToolDescriptor};
use crate::core::error::GatewayError;

/// Buffer and parse the request body.
///
/// Fails with `PayloadTooLarge` when the body exceeds `max_bytes` (checked
/// against Content-Length up front, and enforced again while buffering for
/// chunked bodies) and with `MalformedBody` when parsing fails.
pub async fn receive(request: Request, max_bytes: usize) -> Result<ConversionRequest, GatewayError> {
    let (parts, body) = request.into_parts();

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if let Some(declared) = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok())
        && declared > max_bytes
    {
        return Err(GatewayError::PayloadTooLarge { limit_bytes: max_bytes });
    }

    let bytes = to_bytes(body, max_bytes)
        .await
        .map_err(|_| GatewayError::PayloadTooLarge { limit_bytes: max_bytes })?;

    parse_body(&content_type, bytes).await
}

async fn parse_body(content_type: &str, bytes: Bytes) -> Result<ConversionRequest, GatewayError> {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match media_type.as_str() {
        "multipart/form-data" => parse_multipart(content_type, bytes).await,
        "application/x-www-form-urlencoded" => parse_urlencoded(&bytes),
        "application/json" => parse_json(&bytes),
        "" => Err(GatewayError::malformed_body("missing content type")),
        other => Err(GatewayError::malformed_body(format!(
            "unsupported content type '{other}'"
        ))),
    }
}

async fn parse_multipart(content_type: &str, bytes: Bytes) -> Result<ConversionRequest, GatewayError> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|err| GatewayError::malformed_body(format!("invalid multipart boundary: {err}")))?;

    let stream = futures::stream::once(async move { Ok::<Bytes, std::io::Error>(bytes) });
    let mut multipart = multer::Multipart::new(stream, boundary);
    let mut request = ConversionRequest::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| GatewayError::malformed_body(format!("invalid multipart body: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|err| GatewayError::malformed_body(format!("unreadable multipart part: {err}")))?;

        // A filename marks the part as a file upload; everything else is text.
        if filename.is_some() {
            request.push_file(name, filename, data);
        } else {
            request.set_text(name, String::from_utf8_lossy(&data).into_owned());
        }
    }

    Ok(request)
}

fn parse_urlencoded(bytes: &[u8]) -> Result<ConversionRequest, GatewayError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes)
        .map_err(|err| GatewayError::malformed_body(format!("invalid form body: {err}")))?;

    let mut request = ConversionRequest::new();
    for (name, value) in pairs {
        request.set_text(name, value);
    }
    Ok(request)
}

fn parse_json(bytes: &[u8]) -> Result<ConversionRequest, GatewayError> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(bytes)
        .map_err(|err| GatewayError::malformed_body(format!("invalid JSON body: {err}")))?;

    let mut request = ConversionRequest::new();
    for (name, value) in object {
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            other => {
                return Err(GatewayError::malformed_body(format!(
                    "field '{name}' must be a scalar, got {other}"
                )));
            }
        };
        request.set_text(name, text);
    }
    Ok(request)
}

/// Fail with `MissingField` if any required field of `descriptor` is absent.
pub fn ensure_required_fields(
    descriptor: &ToolDescriptor,
    request: &ConversionRequest,
) -> Result<(), GatewayError> {
    for spec in descriptor.expected_fields {
        if spec.required && !request.has_field(spec) {
            return Err(GatewayError::missing_field(describe_field(spec)));
        }
    }
    Ok(())
}

fn describe_field(spec: &FieldSpec) -> String {
    match spec.kind {
        FieldKind::File => format!("'{}' (file upload)", spec.name),
        FieldKind::Text => format!("'{}' (text)", spec.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    const LIMIT: usize = 1024 * 1024;

    fn post(content_type: &str, body: impl Into<Body>) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/api/test")
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap()
    }

    fn multipart_body(boundary: &str) -> String {
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"files\"; filename=\"a.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             %PDF-1.5 fake\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"width\"\r\n\r\n\
             640\r\n\
             --{boundary}--\r\n"
        )
    }

    #[tokio::test]
    async fn test_multipart_splits_files_and_text() {
        let boundary = "X-DOCGATE-TEST";
        let request = post(
            &format!("multipart/form-data; boundary={boundary}"),
            multipart_body(boundary),
        );

        let parsed = receive(request, LIMIT).await.unwrap();
        let upload = parsed.file("files").unwrap();
        assert_eq!(upload.filename.as_deref(), Some("a.pdf"));
        assert_eq!(&upload.bytes[..], b"%PDF-1.5 fake");
        assert_eq!(parsed.text("width"), Some("640"));
    }

    #[tokio::test]
    async fn test_urlencoded_body() {
        let request = post("application/x-www-form-urlencoded", "text=hello%20world");
        let parsed = receive(request, LIMIT).await.unwrap();
        assert_eq!(parsed.text("text"), Some("hello world"));
    }

    #[tokio::test]
    async fn test_json_body() {
        let request = post("application/json", r#"{"text":"hello","width":640}"#);
        let parsed = receive(request, LIMIT).await.unwrap();
        assert_eq!(parsed.text("text"), Some("hello"));
        assert_eq!(parsed.text("width"), Some("640"));
    }

    #[tokio::test]
    async fn test_nested_json_rejected() {
        let request = post("application/json", r#"{"text":{"nested":true}}"#);
        let err = receive(request, LIMIT).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn test_missing_boundary_is_malformed() {
        let request = post("multipart/form-data", "no boundary here");
        let err = receive(request, LIMIT).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn test_unsupported_content_type_is_malformed() {
        let request = post("text/csv", "a,b,c");
        let err = receive(request, LIMIT).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn test_declared_oversize_rejected_up_front() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/test")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::CONTENT_LENGTH, "100")
            .body(Body::from("text=hi"))
            .unwrap();

        let err = receive(request, 10).await.unwrap_err();
        assert!(matches!(err, GatewayError::PayloadTooLarge { limit_bytes: 10 }));
    }

    #[tokio::test]
    async fn test_oversize_body_rejected_while_buffering() {
        let body = "text=".to_string() + &"x".repeat(64);
        let request = post("application/x-www-form-urlencoded", body);
        let err = receive(request, 16).await.unwrap_err();
        assert!(matches!(err, GatewayError::PayloadTooLarge { .. }));
    }

    #[test]
    fn test_required_field_validation() {
        use crate::domains::convert::converters::QrCodeTool;

        let empty = ConversionRequest::new();
        let err = ensure_required_fields(&QrCodeTool::DESCRIPTOR, &empty).unwrap_err();
        assert!(matches!(err, GatewayError::MissingField(_)));
        assert!(err.to_string().contains("text"));

        let mut filled = ConversionRequest::new();
        filled.set_text("text", "hello");
        ensure_required_fields(&QrCodeTool::DESCRIPTOR, &filled).unwrap();
    }

    #[test]
    fn test_optional_fields_never_block() {
        use crate::domains::convert::converters::ImageResizeTool;

        let mut request = ConversionRequest::new();
        request.push_file("files", Some("a.png".into()), Bytes::from_static(b"png"));
        // width/height optional: absence is fine at validation time.
        ensure_required_fields(&ImageResizeTool::DESCRIPTOR, &request).unwrap();
    }
}
