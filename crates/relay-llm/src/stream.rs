//! Streamed chunk aggregation
//!
//! Text deltas are forwarded immediately as partial responses. Tool-call
//! fragments accumulate per index until the stream ends, then one final
//! response carries the whole turn.

use std::collections::BTreeMap;
use std::pin::Pin;

use async_stream::stream;
use futures_util::Stream;

use crate::convert::{finish_reason_from_wire, parse_json_args, usage_from_wire};
use crate::error::LlmError;
use crate::protocol::openai::{OpenAiStreamChunk, OpenAiStreamToolCall};
use crate::transport::ChunkSource;
use crate::types::{Content, FinishReason, LlmResponse, Part, Role, UsageMetadata};

/// Lazy sequence of responses; an `Err` element is always the last one
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<LlmResponse, LlmError>> + Send>>;

/// One tool call being reassembled from fragments
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct ToolCallBuilder {
    id: String,
    name: String,
    arguments: String,
}

impl ToolCallBuilder {
    /// Id and name take any non-empty value; arguments only grow
    fn apply(&mut self, fragment: &OpenAiStreamToolCall) {
        if let Some(id) = fragment.id.as_deref()
            && !id.is_empty()
        {
            id.clone_into(&mut self.id);
        }

        let Some(function) = &fragment.function else {
            return;
        };

        if let Some(name) = function.name.as_deref()
            && !name.is_empty()
        {
            name.clone_into(&mut self.name);
        }

        if let Some(arguments) = &function.arguments {
            self.arguments.push_str(arguments);
        }
    }

    fn into_part(self) -> Part {
        let args = parse_json_args(&self.arguments);
        Part::function_call(self.id, self.name, args)
    }
}

/// Running state of one streamed turn
///
/// Allocated per stream and never shared.
#[derive(Debug, Default)]
pub struct StreamAggregator {
    text_parts: Vec<Part>,
    tool_calls: BTreeMap<u32, ToolCallBuilder>,
    finish_reason: Option<FinishReason>,
    usage: Option<UsageMetadata>,
}

impl StreamAggregator {
    /// Empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk into the running state
    ///
    /// Returns a partial response holding only the newly received text, if
    /// the chunk carried any. Chunks without choices are ignored entirely,
    /// usage included.
    pub fn push_chunk(&mut self, chunk: &OpenAiStreamChunk) -> Option<LlmResponse> {
        let choice = chunk.choices.first()?;
        let mut partial = None;

        if let Some(text) = choice.delta.content.as_deref()
            && !text.is_empty()
        {
            let part = Part::text(text);
            self.text_parts.push(part.clone());
            partial = Some(LlmResponse {
                content: Content::new(Role::Model, vec![part]),
                partial: true,
                ..LlmResponse::default()
            });
        }

        for fragment in choice.delta.tool_calls.iter().flatten() {
            self.tool_calls
                .entry(fragment.index.unwrap_or_default())
                .or_default()
                .apply(fragment);
        }

        if let Some(reason) = choice.finish_reason.as_deref() {
            self.finish_reason = Some(finish_reason_from_wire(reason));
        }

        if let Some(usage) = &chunk.usage {
            self.usage = Some(usage_from_wire(usage));
        }

        partial
    }

    /// Final response for the turn
    ///
    /// Text parts come first, then function calls in ascending index order.
    pub fn finish(self) -> LlmResponse {
        let mut parts = self.text_parts;
        parts.extend(self.tool_calls.into_values().map(ToolCallBuilder::into_part));

        LlmResponse {
            content: Content::new(Role::Model, parts),
            usage_metadata: self.usage,
            finish_reason: self.finish_reason.unwrap_or_default(),
            partial: false,
            turn_complete: true,
        }
    }
}

/// Closes the wrapped source when dropped
struct CloseOnDrop(Box<dyn ChunkSource>);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Turn a chunk source into a response sequence
///
/// Yields one partial response per text delta, then a single final
/// response once the source reports end of stream. A source error is
/// yielded as the last element. The source is closed on every exit path,
/// including the consumer dropping the sequence early.
pub fn aggregate_stream(source: Box<dyn ChunkSource>) -> ResponseStream {
    Box::pin(stream! {
        let mut source = CloseOnDrop(source);
        let mut aggregator = StreamAggregator::new();
        let mut chunks = 0_usize;

        loop {
            match source.0.recv().await {
                Ok(Some(chunk)) => {
                    chunks += 1;
                    if let Some(partial) = aggregator.push_chunk(&chunk) {
                        yield Ok(partial);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, chunks, "chat completion stream failed");
                    yield Err(e);
                    return;
                }
            }
        }

        source.0.close();
        tracing::debug!(chunks, tool_calls = aggregator.tool_calls.len(), "chat completion stream finished");
        yield Ok(aggregator.finish());
    })
}
