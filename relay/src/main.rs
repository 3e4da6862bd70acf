#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::Write;

use anyhow::Context;
use args::Args;
use clap::Parser;
use futures_util::StreamExt;
use relay_config::Config;
use relay_llm::types::JSON_MIME_TYPE;
use relay_llm::{Content, GenerateContentConfig, LlmRequest, LlmResponse, OpenAiModel, ResponseStream};
use relay_telemetry::LogFormat;
use secrecy::SecretString;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;

    let format = if args.log_json { LogFormat::Json } else { LogFormat::Text };
    relay_telemetry::init(&config.telemetry, format)?;

    let model = OpenAiModel::from_config(&config.model);
    let request = build_request(&args);
    let stream = !args.no_stream;

    tracing::info!(model = %model.name(), stream, "sending prompt");

    let responses = model.generate_content(&request, stream);

    tokio::select! {
        result = print_responses(responses) => result?,
        () = shutdown_signal() => {
            tracing::info!("interrupted, closing stream");
        }
    }

    Ok(())
}

/// Load the config file, or start from defaults when it is absent and the
/// command line names a model
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else if args.model.is_some() {
        Config::default()
    } else {
        anyhow::bail!(
            "config file {} not found; pass --model to run without one",
            args.config.display()
        );
    };

    if let Some(model) = &args.model {
        config.model.name.clone_from(model);
    }
    if let Some(base_url) = &args.base_url {
        config.model.base_url = Some(base_url.clone());
    }
    if let Some(api_key) = &args.api_key {
        config.model.api_key = Some(SecretString::from(api_key.clone()));
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn build_request(args: &Args) -> LlmRequest {
    let config = GenerateContentConfig {
        system_instruction: args.system.as_ref().map(Content::system_text),
        response_mime_type: args.json.then(|| JSON_MIME_TYPE.to_owned()),
        ..GenerateContentConfig::default()
    };

    LlmRequest::new(vec![Content::user_text(args.prompt.join(" "))]).with_config(config)
}

/// Print partial text as it arrives, then whatever the final response adds
async fn print_responses(mut responses: ResponseStream) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    let mut streamed_text = false;

    while let Some(response) = responses.next().await {
        let response = response.context("generation failed")?;

        if response.partial {
            write!(stdout, "{}", response.content.text())?;
            stdout.flush()?;
            streamed_text = true;
            continue;
        }

        print_final(&mut stdout, &response, streamed_text)?;
    }

    Ok(())
}

fn print_final(out: &mut impl Write, response: &LlmResponse, streamed_text: bool) -> anyhow::Result<()> {
    let text = response.content.text();
    if !streamed_text && !text.is_empty() {
        write!(out, "{text}")?;
    }
    if streamed_text || !text.is_empty() {
        writeln!(out)?;
    }

    for call in response.content.function_calls() {
        let args = serde_json::to_string(&call.args)?;
        writeln!(out, "tool call {} [{}]: {args}", call.name, call.id)?;
    }

    if let Some(usage) = &response.usage_metadata {
        tracing::info!(
            prompt_tokens = usage.prompt_token_count,
            completion_tokens = usage.candidates_token_count,
            total_tokens = usage.total_token_count,
            cached_tokens = usage.cached_content_token_count,
            "usage"
        );
    }

    tracing::debug!(finish_reason = ?response.finish_reason, "turn complete");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
