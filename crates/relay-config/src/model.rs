use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default chat-completions endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Target model and the endpoint serving it
///
/// `base_url` and `api_key` are handed to the transport untouched; the
/// adapter itself never interprets them.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Model identifier sent with every request
    #[serde(default)]
    pub name: String,
    /// Endpoint override (defaults to [`DEFAULT_BASE_URL`])
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Bearer credential
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Send `stream_options.include_usage` with streamed requests
    ///
    /// Usage is only read from chunks that also carry a choice, so this
    /// helps with providers that attach usage to the last content chunk.
    #[serde(default)]
    pub include_stream_usage: bool,
}

impl ModelConfig {
    /// Config for `name` against the default endpoint
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the endpoint override
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the bearer credential
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// The configured endpoint, or the default one
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (it is not).
    pub fn base_url_or_default(&self) -> Url {
        self.base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn deserialize_minimal() {
        let config: ModelConfig = toml::from_str(r#"name = "gpt-4o-mini""#).unwrap();
        assert_eq!(config.name, "gpt-4o-mini");
        assert!(config.base_url.is_none());
        assert!(config.api_key.is_none());
        assert!(!config.include_stream_usage);
        assert_eq!(config.base_url_or_default().as_str(), "https://api.openai.com/v1");
    }

    #[test]
    fn deserialize_full() {
        let toml = r#"
            name = "llama3"
            base_url = "http://localhost:11434/v1"
            api_key = "sk-local"
            include_stream_usage = true
        "#;

        let config: ModelConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url_or_default().as_str(), "http://localhost:11434/v1");
        assert_eq!(config.api_key.as_ref().unwrap().expose_secret(), "sk-local");
        assert!(config.include_stream_usage);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = toml::from_str::<ModelConfig>("name = \"m\"\nretries = 3");
        assert!(result.is_err());
    }

    #[test]
    fn builder_helpers() {
        let config = ModelConfig::new("m")
            .with_base_url(Url::parse("https://proxy.example.com/v1").unwrap())
            .with_api_key("sk-test");
        assert_eq!(config.name, "m");
        assert_eq!(config.base_url_or_default().host_str(), Some("proxy.example.com"));
        assert_eq!(config.api_key.unwrap().expose_secret(), "sk-test");
    }
}
