use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Owner of a conversation turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user
    #[default]
    User,
    /// The model itself
    Model,
    /// System instruction
    System,
    /// Any role string this crate does not recognize
    #[serde(other)]
    Unknown,
}

/// One turn of a conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Who produced this turn
    pub role: Role,
    /// Ordered parts making up the turn
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Content with the given role and parts
    pub const fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// A user turn holding a single text part
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::Text(text.into())])
    }

    /// A model turn holding a single text part
    pub fn model_text(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::Text(text.into())])
    }

    /// A system turn holding a single text part
    pub fn system_text(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![Part::Text(text.into())])
    }

    /// Concatenation of every text part, without separators
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }

    /// Function calls in part order
    pub fn function_calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.parts.iter().filter_map(|part| match part {
            Part::FunctionCall(call) => Some(call),
            _ => None,
        })
    }
}

/// A single typed piece of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    /// Plain text
    Text(String),
    /// Tool invocation requested by the model
    FunctionCall(FunctionCall),
    /// Result of a tool invocation
    FunctionResponse(FunctionResponse),
    /// Raw bytes carried inline (images)
    InlineData(Blob),
    /// Reference to an externally stored file
    FileData(FileData),
}

impl Part {
    /// Text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Function-call part
    pub fn function_call(id: impl Into<String>, name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self::FunctionCall(FunctionCall {
            id: id.into(),
            name: name.into(),
            args,
        })
    }

    /// Function-response part
    pub fn function_response(id: impl Into<String>, name: impl Into<String>, response: Map<String, Value>) -> Self {
        Self::FunctionResponse(FunctionResponse {
            id: id.into(),
            name: name.into(),
            response,
        })
    }

    /// Inline-data part
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::InlineData(Blob {
            mime_type: mime_type.into(),
            data: data.into(),
        })
    }

    /// The text of a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Tool invocation requested by the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Call identifier, echoed back in the matching response
    #[serde(default)]
    pub id: String,
    /// Function name
    pub name: String,
    /// Decoded arguments
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// Result of a tool invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Identifier of the call this answers
    #[serde(default)]
    pub id: String,
    /// Function name
    pub name: String,
    /// Structured result
    #[serde(default)]
    pub response: Map<String, Value>,
}

/// Inline binary payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// MIME type, e.g. "image/png"
    pub mime_type: String,
    /// Raw bytes (base64 in serialized form)
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Reference to an externally stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// MIME type of the referenced file
    pub mime_type: String,
    /// Location of the file
    pub file_uri: String,
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
