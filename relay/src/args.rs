use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// Relay chat-completion client
#[derive(Debug, Parser)]
#[command(name = "relay", about = "Send a prompt to an OpenAI-compatible model")]
pub struct Args {
    /// Path to configuration file (optional when --model is given)
    #[arg(short, long, default_value = "relay.toml", env = "RELAY_CONFIG")]
    pub config: PathBuf,

    /// Override the model identifier
    #[arg(short, long, env = "RELAY_MODEL")]
    pub model: Option<String>,

    /// Override the endpoint base URL
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub base_url: Option<Url>,

    /// Override the bearer credential
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// System instruction placed ahead of the prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Wait for the whole answer instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    /// Ask the model for a JSON object
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Prompt text
    #[arg(required = true, num_args = 1..)]
    pub prompt: Vec<String>,
}
