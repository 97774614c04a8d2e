//! Configuration management for the gateway.
//!
//! A single grouped structure populated from defaults or environment
//! variables (dotenv-aware). One externally supplied base URL/port pair
//! selects where the client sends requests and where the server listens; the
//! rest is hardening knobs.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default upload ceiling: 25 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// HTTP bind address and the client-side base URL.
    pub http: HttpConfig,

    /// Request hardening limits.
    pub limits: LimitsConfig,

    /// Cross-origin allow-list.
    pub cors: CorsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the service as reported by the liveness probe.
    pub name: String,

    /// The version of the service.
    pub version: String,
}

/// HTTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Host address to bind to.
    pub host: String,

    /// Port number to listen on.
    pub port: u16,

    /// Base URL the client half posts to.
    pub base_url: String,
}

/// Request hardening limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum accepted payload size in bytes. Uploads above this are
    /// rejected with 413 before any converter runs.
    pub max_upload_bytes: usize,
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the gateway from a browser. Empty means no
    /// CORS layer is mounted at all; the single entry `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "docgate".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            http: HttpConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://127.0.0.1:8080".to_string(),
            },
            limits: LimitsConfig {
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            cors: CorsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Variables are prefixed with `DOCGATE_`: `DOCGATE_HOST`, `DOCGATE_PORT`,
    /// `DOCGATE_BASE_URL`, `DOCGATE_ALLOWED_ORIGINS` (comma-separated),
    /// `DOCGATE_MAX_UPLOAD_BYTES`, `DOCGATE_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(host) = std::env::var("DOCGATE_HOST") {
            config.http.host = host;
        }

        if let Ok(port) = std::env::var("DOCGATE_PORT")
            && let Ok(port) = port.parse()
        {
            config.http.port = port;
        }

        config.http.base_url = std::env::var("DOCGATE_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", config.http.host, config.http.port));

        if let Ok(level) = std::env::var("DOCGATE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(limit) = std::env::var("DOCGATE_MAX_UPLOAD_BYTES") {
            match limit.parse() {
                Ok(bytes) => config.limits.max_upload_bytes = bytes,
                Err(_) => warn!(
                    "DOCGATE_MAX_UPLOAD_BYTES is not a number; keeping the {} byte default",
                    config.limits.max_upload_bytes
                ),
            }
        }

        match std::env::var("DOCGATE_ALLOWED_ORIGINS") {
            Ok(origins) => {
                config.cors.allowed_origins = origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect();
                info!(
                    origins = config.cors.allowed_origins.len(),
                    "CORS allow-list loaded from environment"
                );
            }
            Err(_) => {
                warn!(
                    "DOCGATE_ALLOWED_ORIGINS not set - no CORS headers will be sent, \
                     cross-origin browser clients will be refused"
                );
            }
        }

        config
    }
}
