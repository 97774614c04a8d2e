//! HTTP handlers for conversion routes.
//!
//! One handler serves every tool route: buffer and parse the upload, run the
//! converter on a blocking worker thread, then stream the artifact back. The
//! response is sent only after the converter completes or fails; other
//! requests keep flowing while the conversion runs.

use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use super::payload::ConversionResult;
use super::receiver;
use super::registry::ToolRegistry;
use crate::core::error::GatewayError;
use crate::core::server::AppState;
use crate::domains::convert::ConvertError;

/// Handle one conversion request for the tool registered under `tool_id`.
#[instrument(skip_all, fields(tool = tool_id))]
pub async fn handle_convert(state: AppState, tool_id: &'static str, request: Request) -> Response {
    match convert(state, tool_id, request).await {
        Ok(result) => {
            info!(
                content_type = result.content_type,
                bytes = result.bytes.len(),
                "conversion complete"
            );
            deliver(result)
        }
        Err(err) => err.into_response(),
    }
}

async fn convert(
    state: AppState,
    tool_id: &'static str,
    request: Request,
) -> Result<ConversionResult, GatewayError> {
    let descriptor = ToolRegistry::resolve(tool_id)?;

    let payload = receiver::receive(request, state.config.limits.max_upload_bytes).await?;

    // Converters do CPU-bound work; run them off the async worker threads so
    // this request suspends instead of stalling the event loop.
    tokio::task::spawn_blocking(move || ToolRegistry::dispatch(tool_id, &payload))
        .await
        .map_err(|err| GatewayError::ConversionFailed {
            tool: descriptor.label,
            source: ConvertError::task(err.to_string()),
        })?
}

/// Stream the artifact back: declared MIME type, attachment disposition, raw
/// bytes, no further transformation.
fn deliver(result: ConversionResult) -> Response {
    (
        StatusCode::OK,
        [
            ("Content-Type", result.content_type.to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", result.suggested_filename),
            ),
        ],
        result.bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliver_sets_binary_headers() {
        let response = deliver(ConversionResult::new(
            vec![1, 2, 3],
            "application/pdf",
            "merged.pdf",
        ));

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["content-type"], "application/pdf");
        assert_eq!(
            headers["content-disposition"],
            "attachment; filename=\"merged.pdf\""
        );
    }
}
