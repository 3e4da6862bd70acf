//! Generic LLM model served through an OpenAI-style chat completion API
//!
//! Requests use a provider-agnostic content model (roles, typed parts, tool
//! declarations). [`OpenAiModel`] maps them onto chat messages, sends them
//! through a [`ChatTransport`], and maps the answer back. Streamed answers
//! are reassembled by [`StreamAggregator`] into partial text responses plus
//! one complete final response.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod model;
pub mod protocol;
pub mod stream;
pub mod transport;
pub mod types;

pub use error::LlmError;
pub use model::OpenAiModel;
pub use stream::{ResponseStream, StreamAggregator, aggregate_stream};
pub use transport::{ChatTransport, ChunkSource, HttpTransport};
pub use types::{
    Blob, Content, FileData, FinishReason, FunctionCall, FunctionResponse, GenerateContentConfig, LlmRequest,
    LlmResponse, Part, Role, Schema, SchemaType, Tool, UsageMetadata,
};
