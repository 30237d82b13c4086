//! Programmatic configuration builder for integration tests

use errmap_config::Config;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from defaults
    ///
    /// The listen address is left unset; `TestServer` binds its own listener.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Serve the health check on a different path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
