//! reqwest-backed transport for OpenAI-compatible endpoints

use std::pin::Pin;

use async_trait::async_trait;
use eventsource_stream::{Event, Eventsource};
use futures_util::{Stream, StreamExt};
use relay_config::ModelConfig;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ChatTransport, ChunkSource};
use crate::error::LlmError;
use crate::protocol::openai::{DONE_SENTINEL, OpenAiErrorResponse, OpenAiRequest, OpenAiResponse, OpenAiStreamChunk};

type EventStream = Pin<Box<dyn Stream<Item = Result<Event, LlmError>> + Send>>;

/// Chat completion transport over HTTP
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl HttpTransport {
    /// Transport for the endpoint and credential in `config`
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url_or_default(),
            api_key: config.api_key.clone(),
        }
    }

    /// Use a preconfigured client (proxies, timeouts, custom TLS)
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    async fn send(&self, request: &OpenAiRequest) -> Result<Response, LlmError> {
        let mut builder = self.client.post(self.completions_url()).json(request);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(model = %request.model, error = %e, "upstream request failed");
            LlmError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %request.model, status = %status, "upstream returned error");
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body: error_message(&body),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete_once(&self, request: &OpenAiRequest) -> Result<OpenAiResponse, LlmError> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    async fn complete_stream(&self, request: &OpenAiRequest) -> Result<Box<dyn ChunkSource>, LlmError> {
        let response = self.send(request).await?;

        let events = response
            .bytes_stream()
            .eventsource()
            .map(|result| result.map_err(|e| LlmError::Streaming(e.to_string())));

        Ok(Box::new(SseChunkSource {
            events: Some(Box::pin(events)),
        }))
    }
}

/// Chunks decoded from a server-sent event stream
///
/// Ends at the `[DONE]` sentinel or when the body ends. An in-band error
/// event fails the stream. Other events that do not decode as a chunk are
/// skipped.
pub struct SseChunkSource {
    events: Option<EventStream>,
}

#[async_trait]
impl ChunkSource for SseChunkSource {
    async fn recv(&mut self) -> Result<Option<OpenAiStreamChunk>, LlmError> {
        loop {
            let Some(events) = self.events.as_mut() else {
                return Ok(None);
            };

            let event = match events.next().await {
                Some(Ok(event)) => event,
                Some(Err(e)) => return Err(e),
                None => {
                    self.close();
                    return Ok(None);
                }
            };

            let data = event.data.trim();
            if data == DONE_SENTINEL {
                self.close();
                return Ok(None);
            }
            if data.is_empty() {
                continue;
            }

            if let Ok(failure) = serde_json::from_str::<OpenAiErrorResponse>(data) {
                tracing::warn!(message = %failure.error.message, "provider sent error event mid-stream");
                self.close();
                return Err(LlmError::Streaming(failure.error.message));
            }

            match serde_json::from_str::<OpenAiStreamChunk>(data) {
                Ok(chunk) => return Ok(Some(chunk)),
                Err(e) => {
                    tracing::debug!(error = %e, data = %data, "skipping unparseable SSE chunk");
                }
            }
        }
    }

    fn close(&mut self) {
        if self.events.take().is_some() {
            tracing::trace!("closed SSE stream");
        }
    }
}

/// Provider error message from an error body, or the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(|_| body.to_owned(), |parsed| parsed.error.message)
}
