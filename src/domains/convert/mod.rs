//! Conversion domain.
//!
//! Everything between "HTTP body parsed" and "artifact bytes produced":
//!
//! - `payload.rs` — request/result/descriptor types
//! - `receiver.rs` — body parsing and field validation
//! - `registry.rs` — descriptor table and converter dispatch
//! - `handlers.rs` — the HTTP handler gluing the above together
//! - `converters/` — one leaf transformation per file

pub mod converters;
mod error;
pub mod handlers;
pub mod payload;
pub mod receiver;
mod registry;

pub use error::ConvertError;
pub use payload::{ConversionRequest, ConversionResult, FieldKind, FieldSpec, ToolDescriptor, UploadedFile};
pub use registry::{DESCRIPTORS, ToolRegistry};
