//! Runtime configuration.
//!
//! Values come from `TODO_`-prefixed environment variables through the
//! `config` crate; anything unset falls back to its default.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

/// Runtime settings, read from `TODO_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// How long in-flight requests get to finish after a shutdown signal.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// `TODO_HOST`, `TODO_PORT` and `TODO_SHUTDOWN_TIMEOUT_SECS` override
    /// the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(None)
    }

    /// Same as `from_env`, but reads from `vars` instead of the process
    /// environment when given.
    pub fn from_source(vars: Option<HashMap<String, String>>) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("TODO")
                    .try_parsing(true)
                    .source(vars),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = Config::from_source(vars(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn prefixed_variables_override_defaults() {
        let config = Config::from_source(vars(&[
            ("TODO_HOST", "127.0.0.1"),
            ("TODO_PORT", "3000"),
            ("TODO_SHUTDOWN_TIMEOUT_SECS", "1"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn unprefixed_variables_are_ignored() {
        let config = Config::from_source(vars(&[("PORT", "1234"), ("HOST", "laptop")])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_port_is_an_error() {
        assert!(Config::from_source(vars(&[("TODO_PORT", "not-a-port")])).is_err());
    }
}
