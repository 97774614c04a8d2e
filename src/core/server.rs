//! Gateway server — route assembly and lifecycle.
//!
//! The router is derived from the tool registry: one POST route per
//! descriptor, a liveness probe on `/`, and a fallback that answers unmatched
//! paths with the `UnknownTool` envelope instead of a bare 404. Cross-origin
//! access is limited to the configured allow-list.

use std::sync::Arc;

use axum::{
    Json,
    extract::Request,
    http::{HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use thiserror::Error;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::config::Config;
use crate::core::error::GatewayError;
use crate::domains::convert::{ToolRegistry, handlers};

/// Result type for server startup and shutdown.
pub type ServeResult<T> = Result<T, ServeError>;

/// Errors that can occur while starting or running the server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Failed to bind to the configured address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while serving.
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServeError {
    fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration.
    pub config: Arc<Config>,
}

/// The conversion gateway server.
pub struct GatewayServer {
    config: Arc<Config>,
}

impl GatewayServer {
    /// Create a new gateway server with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The address the server binds to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.http.host, self.config.http.port)
    }

    /// Build the router: one route per registered tool, the liveness probe,
    /// the unknown-tool fallback, and the CORS/trace layers.
    pub fn router(&self) -> Router {
        let state = AppState {
            config: self.config.clone(),
        };

        let probe_state = state.clone();
        let mut router = Router::new().route("/", get(move || liveness(probe_state)));

        for descriptor in ToolRegistry::descriptors() {
            let tool_state = state.clone();
            let tool_id = descriptor.id;
            router = router.route(
                descriptor.endpoint_path,
                post(move |request: Request| handlers::handle_convert(tool_state, tool_id, request)),
            );
        }

        router = router.fallback(unknown_route);

        if let Some(cors) = cors_layer(&self.config.cors.allowed_origins) {
            router = router.layer(cors);
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until shutdown. Blocks the calling task.
    pub async fn run(self) -> ServeResult<()> {
        let addr = self.address();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|err| ServeError::bind(&addr, err))?;

        info!("Ready - listening on {}", addr);
        for descriptor in ToolRegistry::descriptors() {
            info!("  → {:<12} POST {}", descriptor.id, descriptor.endpoint_path);
        }
        info!("  → liveness     GET /");

        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// Build the CORS layer from the allow-list. `None` when the list is empty:
/// no CORS headers are sent and browsers refuse cross-origin reads.
fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    if allowed_origins.is_empty() {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparseable allowed origin");
                None
            }
        })
        .collect();

    Some(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Liveness probe.
async fn liveness(state: AppState) -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "message": format!(
            "{} is running and ready for conversion requests",
            state.config.server.name
        ),
        "version": state.config.server.version,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
    .into_response()
}

/// Unmatched paths get the UnknownTool envelope rather than an empty 404.
async fn unknown_route(uri: Uri) -> Response {
    GatewayError::unknown_tool(uri.path()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_origins_no_layer() {
        assert!(cors_layer(&[]).is_none());
    }

    #[test]
    fn test_origin_list_builds_layer() {
        let origins = vec!["https://example.com".to_string()];
        assert!(cors_layer(&origins).is_some());
    }

    #[test]
    fn test_wildcard_builds_layer() {
        let origins = vec!["*".to_string()];
        assert!(cors_layer(&origins).is_some());
    }

    #[test]
    fn test_address_formatting() {
        let server = GatewayServer::new(Config::default());
        assert_eq!(server.address(), "127.0.0.1:8080");
    }
}
