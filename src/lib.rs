//! Document Conversion Gateway
//!
//! A stateless HTTP gateway: a client submits a file (or text payload) tagged
//! with a desired transformation, the gateway dispatches it to the matching
//! converter, and streams the transformed artifact back as a downloadable
//! binary.
//!
//! # Architecture
//!
//! - **core**: configuration, the error taxonomy and wire envelope, and the
//!   axum server lifecycle
//! - **domains::convert**: payload types, the upload receiver, the tool
//!   registry/dispatcher, and the individual converters
//! - **client**: the consuming half — posts payloads, decodes error
//!   envelopes, and saves artifacts through scoped download handles
//!
//! Server and client resolve tools through the same static registry, so the
//! endpoint table cannot drift between the two halves.
//!
//! # Example
//!
//! ```rust,no_run
//! use docgate::core::{Config, GatewayServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     GatewayServer::new(config).run().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use client::{ConversionInput, GatewayClient};
pub use core::{Config, ErrorEnvelope, GatewayError, GatewayServer, Result};
pub use domains::convert::{ToolDescriptor, ToolRegistry};
