//! Chat completion transport seam
//!
//! The adapter treats the network as two opaque calls: a one-shot
//! completion and a stream of chunks. [`http::HttpTransport`] is the stock
//! implementation; tests substitute scripted ones.

pub mod http;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::protocol::openai::{OpenAiRequest, OpenAiResponse, OpenAiStreamChunk};

pub use http::{HttpTransport, SseChunkSource};

/// Something that can send chat completion requests
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a one-shot request and return the full response
    async fn complete_once(&self, request: &OpenAiRequest) -> Result<OpenAiResponse, LlmError>;

    /// Open a streamed response
    async fn complete_stream(&self, request: &OpenAiRequest) -> Result<Box<dyn ChunkSource>, LlmError>;
}

/// Ordered source of streamed chunks
///
/// `recv` returns `Ok(None)` once the stream has ended. `close` releases the
/// underlying connection; it may be called any number of times, and `recv`
/// after `close` reports end of stream.
#[async_trait]
pub trait ChunkSource: Send {
    /// Next chunk, or `None` at end of stream
    async fn recv(&mut self) -> Result<Option<OpenAiStreamChunk>, LlmError>;

    /// Release the underlying resource
    fn close(&mut self);
}
