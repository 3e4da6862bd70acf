use serde::{Deserialize, Serialize};

use super::content::Content;

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Not reported, or not recognized
    #[default]
    Unspecified,
    /// Natural stop, including stopping to call tools
    Stop,
    /// Output token cap reached
    MaxTokens,
    /// Blocked by a content filter
    Safety,
}

/// Token accounting for one response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt
    pub prompt_token_count: u32,
    /// Tokens in the generated output
    pub candidates_token_count: u32,
    /// Prompt plus output
    pub total_token_count: u32,
    /// Prompt tokens served from the provider's cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_content_token_count: Option<u32>,
}

/// One element of the response sequence
///
/// Streaming produces any number of `partial` responses, each carrying only
/// newly received text, followed by one final response with `turn_complete`
/// set and the full aggregated content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    /// Generated content, always role `model`
    pub content: Content,
    /// Token usage, when the provider reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    /// Stop reason
    #[serde(default)]
    pub finish_reason: FinishReason,
    /// Incremental piece of a streamed answer
    #[serde(default)]
    pub partial: bool,
    /// Last response of the turn
    #[serde(default)]
    pub turn_complete: bool,
}
