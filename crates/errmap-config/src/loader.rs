use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable expansion, TOML parsing or
    /// validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the health path is not an absolute static path or
    /// the log filter is empty
    pub fn validate(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        if health.enabled {
            if !health.path.starts_with('/') {
                anyhow::bail!("server.health.path must start with '/': {}", health.path);
            }
            if health.path.contains(['{', '}']) {
                anyhow::bail!("server.health.path must not contain route parameters: {}", health.path);
            }
        }

        if self.telemetry.log_filter.trim().is_empty() {
            anyhow::bail!("telemetry.log_filter must not be empty");
        }

        Ok(())
    }
}
