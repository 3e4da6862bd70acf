//! Generic content -> chat message

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::LlmError;
use crate::protocol::openai::{
    FUNCTION_TYPE, OpenAiContent, OpenAiContentPart, OpenAiFunctionCall, OpenAiImageUrl, OpenAiMessage,
    OpenAiToolCall,
};
use crate::types::{Blob, Content, FunctionCall, Part, Role};

/// Detail hint attached to every inline image
const IMAGE_DETAIL: &str = "auto";

/// Wire role for a generic role
///
/// Unknown roles are sent as "user".
pub const fn role_to_wire(role: Role) -> &'static str {
    match role {
        Role::Model => "assistant",
        Role::System => "system",
        Role::User | Role::Unknown => "user",
    }
}

/// Convert one generic content into one chat message
///
/// A lone non-empty text part becomes scalar string content. Anything else
/// is folded part by part: text and inline images go to array content,
/// function calls to `tool_calls`, and a function response turns the whole
/// message into a `tool` message carrying the JSON-encoded result. File
/// references have no wire representation and are dropped. When both array
/// content and a scalar result exist, the array wins.
///
/// # Errors
///
/// Returns [`LlmError::Serialization`] if call arguments or a function
/// response cannot be encoded as JSON
pub fn content_to_message(content: &Content) -> Result<OpenAiMessage, LlmError> {
    let mut message = OpenAiMessage {
        role: role_to_wire(content.role).to_owned(),
        ..OpenAiMessage::default()
    };

    if let [Part::Text(text)] = content.parts.as_slice()
        && !text.is_empty()
    {
        message.content = Some(OpenAiContent::Text(text.clone()));
        return Ok(message);
    }

    let mut scalar = None;
    let mut parts = Vec::new();
    let mut tool_calls = Vec::new();

    for part in &content.parts {
        match part {
            Part::Text(text) => {
                if !text.is_empty() {
                    parts.push(OpenAiContentPart::Text { text: text.clone() });
                }
            }
            Part::InlineData(blob) => parts.push(image_part(blob)),
            Part::FunctionCall(call) => tool_calls.push(tool_call(call)?),
            Part::FunctionResponse(response) => {
                let encoded = serde_json::to_string(&response.response).map_err(|source| LlmError::Serialization {
                    context: "function response",
                    source,
                })?;
                "tool".clone_into(&mut message.role);
                message.tool_call_id = Some(response.id.clone());
                scalar = Some(encoded);
            }
            Part::FileData(file) => {
                tracing::debug!(
                    mime_type = %file.mime_type,
                    file_uri = %file.file_uri,
                    "dropping file reference, chat messages cannot carry file URIs"
                );
            }
        }
    }

    message.content = if parts.is_empty() {
        scalar.filter(|text| !text.is_empty()).map(OpenAiContent::Text)
    } else {
        Some(OpenAiContent::Parts(parts))
    };

    if !tool_calls.is_empty() {
        message.tool_calls = Some(tool_calls);
    }

    Ok(message)
}

/// Inline bytes as a base64 data URL image part
fn image_part(blob: &Blob) -> OpenAiContentPart {
    let encoded = STANDARD.encode(&blob.data);
    OpenAiContentPart::ImageUrl {
        image_url: OpenAiImageUrl {
            url: format!("data:{};base64,{encoded}", blob.mime_type),
            detail: Some(IMAGE_DETAIL.to_owned()),
        },
    }
}

fn tool_call(call: &FunctionCall) -> Result<OpenAiToolCall, LlmError> {
    let arguments = serde_json::to_string(&call.args).map_err(|source| LlmError::Serialization {
        context: "function call arguments",
        source,
    })?;

    Ok(OpenAiToolCall {
        id: call.id.clone(),
        tool_type: FUNCTION_TYPE.to_owned(),
        function: OpenAiFunctionCall {
            name: call.name.clone(),
            arguments,
        },
    })
}
