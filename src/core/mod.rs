//! Core module containing shared infrastructure components.
//!
//! Configuration, the gateway error taxonomy and wire envelope, and the HTTP
//! server lifecycle live here; the conversion logic itself is under
//! `domains::convert`.

pub mod config;
pub mod error;
pub mod server;

pub use config::Config;
pub use error::{ErrorEnvelope, GatewayError, Result};
pub use server::{AppState, GatewayServer, ServeError};
