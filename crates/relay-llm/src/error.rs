use thiserror::Error;

/// Errors produced while serving a generic request through the chat API
///
/// Transport variants are created by the transport and passed through
/// untouched; the adapter adds no retry or reclassification.
#[derive(Debug, Error)]
pub enum LlmError {
    /// A tool declared neither a schema tree nor a raw JSON Schema
    #[error("tool '{name}' has no parameter schema; only function tools with a declared schema are supported")]
    InvalidTool {
        /// Name of the offending tool
        name: String,
    },

    /// Provider answered with zero choices
    #[error("no choices in chat completion response")]
    NoChoices,

    /// Generic-side data could not be encoded as JSON
    #[error("failed to serialize {context}: {source}")]
    Serialization {
        /// What was being serialized
        context: &'static str,
        /// Underlying encoder error
        #[source]
        source: serde_json::Error,
    },

    /// HTTP transport failure (connect, TLS, body read, decode)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status
    #[error("provider returned {status}: {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body or extracted error message
        body: String,
    },

    /// Failure while reading a streamed response
    #[error("streaming error: {0}")]
    Streaming(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LlmError {
    /// Whether the caller supplied malformed input
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidTool { .. } | Self::Serialization { .. })
    }
}
