use std::path::Path;

use anyhow::Context;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then parses and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// resolved, the TOML is malformed, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&raw)
    }

    /// Parse configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], minus the file access
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).context("config variable expansion failed")?;
        let config: Self = toml::from_str(&expanded).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns an error if no model is named or the endpoint is not HTTP(S)
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model.name.trim().is_empty() {
            anyhow::bail!("model.name must not be empty");
        }

        if let Some(ref base_url) = self.model.base_url
            && !matches!(base_url.scheme(), "http" | "https")
        {
            anyhow::bail!("model.base_url must use http or https, got '{}'", base_url.scheme());
        }

        Ok(())
    }
}
