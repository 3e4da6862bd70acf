//! Generic, provider-agnostic model types
//!
//! Content is a role plus an ordered list of typed parts. These types are what
//! callers build requests from and what every response is converted back to.

pub mod content;
pub mod request;
pub mod response;
pub mod tool;

pub use content::{Blob, Content, FileData, FunctionCall, FunctionResponse, Part, Role};
pub use request::{GenerateContentConfig, JSON_MIME_TYPE, LlmRequest};
pub use response::{FinishReason, LlmResponse, UsageMetadata};
pub use tool::{Schema, SchemaType, Tool};
