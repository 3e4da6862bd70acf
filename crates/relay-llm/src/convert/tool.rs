//! Generic tool declarations -> chat tool definitions

use crate::error::LlmError;
use crate::protocol::openai::{FUNCTION_TYPE, OpenAiFunction, OpenAiTool};
use crate::types::Tool;

use super::schema::schema_to_json;

/// Convert tool declarations into wire function tools
///
/// A raw JSON Schema document is forwarded as-is; otherwise the generic
/// schema tree is rendered. Empty descriptions are omitted.
///
/// # Errors
///
/// Returns [`LlmError::InvalidTool`] for the first tool that declares no
/// parameter schema at all
pub fn tools_to_wire(tools: &[Tool]) -> Result<Vec<OpenAiTool>, LlmError> {
    tools.iter().map(tool_to_wire).collect()
}

fn tool_to_wire(tool: &Tool) -> Result<OpenAiTool, LlmError> {
    let parameters = match (&tool.parameters_json_schema, &tool.parameters) {
        (Some(raw), _) => raw.clone(),
        (None, Some(schema)) => schema_to_json(Some(schema)),
        (None, None) => {
            return Err(LlmError::InvalidTool {
                name: tool.name.clone(),
            });
        }
    };

    Ok(OpenAiTool {
        tool_type: FUNCTION_TYPE.to_owned(),
        function: OpenAiFunction {
            name: tool.name.clone(),
            description: (!tool.description.is_empty()).then(|| tool.description.clone()),
            parameters: Some(parameters),
        },
    })
}
