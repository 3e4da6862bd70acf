use std::sync::Arc;

use async_stream::stream;
use futures_util::StreamExt;
use relay_config::ModelConfig;

use crate::convert::{build_chat_request, build_stream_request, response_from_wire};
use crate::stream::{ResponseStream, aggregate_stream};
use crate::transport::{ChatTransport, HttpTransport};
use crate::types::LlmRequest;

/// A generic LLM served by an OpenAI-style chat completion endpoint
///
/// Holds no per-request state; any number of requests may run against one
/// instance concurrently.
#[derive(Clone)]
pub struct OpenAiModel {
    name: String,
    transport: Arc<dyn ChatTransport>,
    include_stream_usage: bool,
}

impl OpenAiModel {
    /// Model `name` served through `transport`
    pub fn new(name: impl Into<String>, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            name: name.into(),
            transport,
            include_stream_usage: false,
        }
    }

    /// Model served over HTTP as described by `config`
    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.name.clone(), Arc::new(HttpTransport::from_config(config)))
            .with_stream_usage(config.include_stream_usage)
    }

    /// Whether streamed requests send `stream_options.include_usage`
    #[must_use]
    pub const fn with_stream_usage(mut self, include: bool) -> Self {
        self.include_stream_usage = include;
        self
    }

    /// Configured model identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generate a response for `request`
    ///
    /// The result has the same shape in both modes. One-shot mode yields a
    /// single complete response. Streaming mode yields partial text
    /// responses followed by one complete response. Any failure is yielded
    /// as the last element. Nothing is sent until the sequence is first
    /// polled, and dropping it early releases the connection.
    pub fn generate_content(&self, request: &LlmRequest, stream: bool) -> ResponseStream {
        if stream {
            self.generate_stream(request)
        } else {
            self.generate_once(request)
        }
    }

    fn generate_once(&self, request: &LlmRequest) -> ResponseStream {
        let wire = build_chat_request(request, &self.name);
        let transport = Arc::clone(&self.transport);
        let model = self.name.clone();

        Box::pin(stream! {
            let wire = match wire {
                Ok(wire) => wire,
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "failed to build chat request");
                    yield Err(e);
                    return;
                }
            };

            tracing::debug!(model = %model, messages = wire.messages.len(), "sending chat completion");

            let result = match transport.complete_once(&wire).await {
                Ok(response) => response_from_wire(response),
                Err(e) => Err(e),
            };

            if let Err(e) = &result {
                tracing::warn!(model = %model, error = %e, "chat completion failed");
            }

            yield result;
        })
    }

    fn generate_stream(&self, request: &LlmRequest) -> ResponseStream {
        let wire = build_stream_request(request, &self.name, self.include_stream_usage);
        let transport = Arc::clone(&self.transport);
        let model = self.name.clone();

        Box::pin(stream! {
            let wire = match wire {
                Ok(wire) => wire,
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "failed to build chat request");
                    yield Err(e);
                    return;
                }
            };

            tracing::debug!(model = %model, messages = wire.messages.len(), "opening chat completion stream");

            let source = match transport.complete_stream(&wire).await {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "failed to open chat completion stream");
                    yield Err(e);
                    return;
                }
            };

            let mut responses = aggregate_stream(source);
            while let Some(response) = responses.next().await {
                yield response;
            }
        })
    }
}

impl std::fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("name", &self.name)
            .field("include_stream_usage", &self.include_stream_usage)
            .finish_non_exhaustive()
    }
}
