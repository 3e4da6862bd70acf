//! Configuration for the relay adapter
//!
//! A single TOML file describes the target model, the transport endpoint and
//! the logging filter. Values may reference environment variables through
//! `{{ env.VAR }}` placeholders.

#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod model;
pub mod telemetry;

use serde::Deserialize;

pub use env::EnvError;
pub use model::*;
pub use telemetry::TelemetryConfig;

/// Top-level relay configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Target model and transport settings
    #[serde(default)]
    pub model: ModelConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
