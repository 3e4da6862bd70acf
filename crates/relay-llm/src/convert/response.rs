//! Chat completion response -> generic response

use crate::error::LlmError;
use crate::protocol::openai::{FUNCTION_TYPE, OpenAiResponse, OpenAiUsage};
use crate::types::{Content, FinishReason, LlmResponse, Part, Role, UsageMetadata};

use super::parse_json_args;

/// Map a wire finish reason
///
/// Tool-call stops fold into [`FinishReason::Stop`]; anything unknown is
/// [`FinishReason::Unspecified`].
pub fn finish_reason_from_wire(reason: &str) -> FinishReason {
    match reason {
        "stop" | "tool_calls" | "function_call" => FinishReason::Stop,
        "length" => FinishReason::MaxTokens,
        "content_filter" => FinishReason::Safety,
        _ => FinishReason::Unspecified,
    }
}

/// Map wire usage counters, including cached prompt tokens when reported
pub fn usage_from_wire(usage: &OpenAiUsage) -> UsageMetadata {
    UsageMetadata {
        prompt_token_count: usage.prompt_tokens,
        candidates_token_count: usage.completion_tokens,
        total_token_count: usage.total_tokens,
        cached_content_token_count: usage.prompt_tokens_details.as_ref().map(|details| details.cached_tokens),
    }
}

/// Convert a one-shot response into a single complete generic response
///
/// Only the first choice is read. Tool calls of any type other than
/// `function` are skipped, and unparseable arguments become an empty map.
/// Usage is attached only when the provider reported a positive total.
///
/// # Errors
///
/// Returns [`LlmError::NoChoices`] if the response carries no choices
pub fn response_from_wire(response: OpenAiResponse) -> Result<LlmResponse, LlmError> {
    let OpenAiResponse { choices, usage, .. } = response;
    let choice = choices.into_iter().next().ok_or(LlmError::NoChoices)?;

    let mut parts = Vec::new();

    if let Some(text) = choice.message.content
        && !text.is_empty()
    {
        parts.push(Part::Text(text));
    }

    for call in choice.message.tool_calls.unwrap_or_default() {
        if call.tool_type != FUNCTION_TYPE {
            tracing::debug!(tool_type = %call.tool_type, id = %call.id, "skipping non-function tool call");
            continue;
        }
        let args = parse_json_args(&call.function.arguments);
        parts.push(Part::function_call(call.id, call.function.name, args));
    }

    Ok(LlmResponse {
        content: Content::new(Role::Model, parts),
        usage_metadata: usage.filter(|usage| usage.total_tokens > 0).as_ref().map(usage_from_wire),
        finish_reason: choice
            .finish_reason
            .as_deref()
            .map_or(FinishReason::Unspecified, finish_reason_from_wire),
        partial: false,
        turn_complete: true,
    })
}
