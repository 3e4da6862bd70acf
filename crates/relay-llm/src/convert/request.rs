//! Generic request -> chat completion request

use crate::error::LlmError;
use crate::protocol::openai::{OpenAiMessage, OpenAiRequest, OpenAiResponseFormat, OpenAiStreamOptions};
use crate::types::{JSON_MIME_TYPE, LlmRequest};

use super::extract_text;
use super::message::content_to_message;
use super::tool::tools_to_wire;

/// Build a one-shot chat completion request
///
/// Contents keep their order. A system instruction becomes one extra
/// system message placed ahead of them. No partial request is ever
/// returned.
///
/// # Errors
///
/// Returns the first message or tool conversion error
pub fn build_chat_request(request: &LlmRequest, model: &str) -> Result<OpenAiRequest, LlmError> {
    let mut messages = request
        .contents
        .iter()
        .map(content_to_message)
        .collect::<Result<Vec<_>, _>>()?;

    let mut wire = OpenAiRequest {
        model: model.to_owned(),
        ..OpenAiRequest::default()
    };

    if let Some(config) = &request.config {
        wire.temperature = config.temperature;
        wire.top_p = config.top_p;
        wire.max_tokens = config.max_output_tokens.filter(|&tokens| tokens > 0);

        if !config.stop_sequences.is_empty() {
            wire.stop = Some(config.stop_sequences.clone());
        }

        if !config.tools.is_empty() {
            wire.tools = Some(tools_to_wire(&config.tools)?);
        }

        if let Some(instruction) = &config.system_instruction {
            messages.insert(0, OpenAiMessage::system(extract_text(Some(instruction))));
        }

        if config.response_mime_type.as_deref() == Some(JSON_MIME_TYPE) {
            wire.response_format = Some(OpenAiResponseFormat::json_object());
        }
    }

    wire.messages = messages;
    Ok(wire)
}

/// Build a streaming chat completion request
///
/// Same as [`build_chat_request`] with streaming switched on. With
/// `include_usage` the provider is asked to report usage on the final chunk.
///
/// # Errors
///
/// Returns the first message or tool conversion error
pub fn build_stream_request(request: &LlmRequest, model: &str, include_usage: bool) -> Result<OpenAiRequest, LlmError> {
    let mut wire = build_chat_request(request, model)?;
    wire.stream = Some(true);
    if include_usage {
        wire.stream_options = Some(OpenAiStreamOptions { include_usage: true });
    }
    Ok(wire)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::types::{Content, GenerateContentConfig, Part, Role, Schema, SchemaType, Tool};

    fn conversation() -> Vec<Content> {
        vec![
            Content::user_text("What's the weather in Paris?"),
            Content::model_text("Let me look that up."),
        ]
    }

    #[test]
    fn bare_request_maps_contents_in_order() {
        let wire = build_chat_request(&LlmRequest::new(conversation()), "gpt-4o-mini").unwrap();

        assert_eq!(wire.model, "gpt-4o-mini");
        let roles: Vec<_> = wire.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["user", "assistant"]);
        assert!(wire.temperature.is_none());
        assert!(wire.tools.is_none());
        assert!(wire.stream.is_none());
    }

    #[test]
    fn system_instruction_is_prepended() {
        let config = GenerateContentConfig {
            system_instruction: Some(Content::new(
                Role::System,
                vec![Part::text("You are terse."), Part::text("Answer in French.")],
            )),
            ..GenerateContentConfig::default()
        };
        let request = LlmRequest::new(conversation()).with_config(config);

        let wire = build_chat_request(&request, "m").unwrap();
        assert_eq!(wire.messages.len(), 3);
        assert_eq!(wire.messages[0].role, "system");
        assert_eq!(wire.messages[0].text(), Some("You are terse.\nAnswer in French."));
        assert_eq!(wire.messages[1].text(), Some("What's the weather in Paris?"));
    }

    #[test]
    fn scalar_settings_are_applied() {
        let config = GenerateContentConfig {
            temperature: Some(0.2),
            top_p: Some(0.9),
            max_output_tokens: Some(256),
            stop_sequences: vec!["END".to_owned()],
            ..GenerateContentConfig::default()
        };
        let wire = build_chat_request(&LlmRequest::new(conversation()).with_config(config), "m").unwrap();

        assert_eq!(wire.temperature, Some(0.2));
        assert_eq!(wire.top_p, Some(0.9));
        assert_eq!(wire.max_tokens, Some(256));
        assert_eq!(wire.stop, Some(vec!["END".to_owned()]));
    }

    #[test]
    fn zero_and_empty_settings_are_omitted() {
        let config = GenerateContentConfig {
            max_output_tokens: Some(0),
            response_mime_type: Some("text/plain".to_owned()),
            ..GenerateContentConfig::default()
        };
        let wire = build_chat_request(&LlmRequest::new(conversation()).with_config(config), "m").unwrap();

        let body = serde_json::to_value(&wire).unwrap();
        let keys: Vec<_> = body.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2, "unexpected keys: {keys:?}");
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("stop").is_none());
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn json_mime_type_enables_json_mode() {
        let config = GenerateContentConfig {
            response_mime_type: Some("application/json".to_owned()),
            ..GenerateContentConfig::default()
        };
        let wire = build_chat_request(&LlmRequest::new(conversation()).with_config(config), "m").unwrap();

        let body = serde_json::to_value(&wire).unwrap();
        assert_eq!(body["response_format"], json!({"type": "json_object"}));
    }

    #[test]
    fn tools_are_converted() {
        let config = GenerateContentConfig {
            tools: vec![Tool::new(
                "get_weather",
                "Current weather",
                Schema::of(SchemaType::Object).property("location", Schema::of(SchemaType::String), true),
            )],
            ..GenerateContentConfig::default()
        };
        let wire = build_chat_request(&LlmRequest::new(conversation()).with_config(config), "m").unwrap();

        let tools = wire.tools.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].function.name, "get_weather");
    }

    #[test]
    fn invalid_tool_fails_the_whole_build() {
        let config = GenerateContentConfig {
            tools: vec![Tool {
                name: "no_schema".to_owned(),
                ..Tool::default()
            }],
            ..GenerateContentConfig::default()
        };
        let err = build_chat_request(&LlmRequest::new(conversation()).with_config(config), "m").unwrap_err();
        assert!(matches!(err, LlmError::InvalidTool { .. }));
    }

    #[test]
    fn stream_request_sets_flags() {
        let request = LlmRequest::new(conversation());

        let with_usage = serde_json::to_value(build_stream_request(&request, "m", true).unwrap()).unwrap();
        assert_eq!(with_usage["stream"], Value::Bool(true));
        assert_eq!(with_usage["stream_options"], json!({"include_usage": true}));

        let without_usage = serde_json::to_value(build_stream_request(&request, "m", false).unwrap()).unwrap();
        assert_eq!(without_usage["stream"], Value::Bool(true));
        assert!(without_usage.get("stream_options").is_none());
    }
}
