//! Conversion between the generic content model and the chat-completion wire format
//!
//! Outbound conversions (`message`, `tool`, `schema`, `request`) fail only on
//! caller mistakes or unserializable data. Inbound conversions (`response`,
//! plus the stream aggregator) are lenient: malformed embedded JSON degrades
//! to an empty argument map.

pub mod message;
pub mod request;
pub mod response;
pub mod schema;
pub mod tool;

use serde_json::{Map, Value};

use crate::types::{Content, Part};

pub use message::{content_to_message, role_to_wire};
pub use request::{build_chat_request, build_stream_request};
pub use response::{finish_reason_from_wire, response_from_wire, usage_from_wire};
pub use schema::schema_to_json;
pub use tool::tools_to_wire;

/// Decode tool-call arguments, falling back to an empty map
///
/// Providers occasionally emit truncated or non-object argument text; that
/// must never fail the enclosing response.
pub fn parse_json_args(arguments: &str) -> Map<String, Value> {
    if arguments.trim().is_empty() {
        return Map::new();
    }

    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::debug!(kind = json_kind(&other), "tool arguments are not a JSON object, using empty map");
            Map::new()
        }
        Err(e) => {
            tracing::debug!(error = %e, "failed to parse tool arguments, using empty map");
            Map::new()
        }
    }
}

/// Non-empty text parts of `content`, joined by newlines
pub fn extract_text(content: Option<&Content>) -> String {
    content
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(Part::as_text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
