//! Configuration for policyweaver runs
//!
//! Loads configuration from:
//! 1. config.yaml - source map (policy type, Fabric target, table overrides) and logging
//! 2. .env file - secrets (service principal secret, Fabric API token)
//!
//! Environment variables always override config.yaml values.

use policyweaver_model::SourceMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing required configuration value: {0}")]
    MissingValue(String),
}

/// Filter used when neither `logging.level` nor `RUST_LOG` is set
pub const DEFAULT_LOG_LEVEL: &str = "info,policyweaver_core=debug,policyweaver_clients=debug";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or module-specific.
    /// An explicit value replaces the default filter entirely.
    pub level: String,

    /// Output format: pretty, json, compact
    pub format: String,

    /// Output destination: stdout, file, both
    pub output: String,

    /// Directory for log files
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: "pretty".to_string(),
            output: "stdout".to_string(),
            directory: "./logs".to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub source: SourceMap,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Overwrite `target` when `var` is set and non-empty
fn override_from_env(target: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var) {
        if !value.is_empty() {
            *target = value;
        }
    }
}

fn override_option_from_env(target: &mut Option<String>, var: &str) {
    if let Ok(value) = std::env::var(var) {
        if !value.is_empty() {
            *target = Some(value);
        }
    }
}

impl Config {
    /// Load configuration from YAML file with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        let sp = &mut self.source.service_principal;
        override_from_env(&mut sp.tenant_id, "PW_SERVICE_PRINCIPAL_TENANT_ID");
        override_from_env(&mut sp.client_id, "PW_SERVICE_PRINCIPAL_CLIENT_ID");
        override_from_env(&mut sp.client_secret, "PW_SERVICE_PRINCIPAL_CLIENT_SECRET");

        let fabric = &mut self.source.fabric;
        override_from_env(&mut fabric.api_token, "PW_FABRIC_API_TOKEN");
        override_from_env(&mut fabric.workspace_id, "PW_FABRIC_WORKSPACE_ID");
        override_option_from_env(&mut fabric.lakehouse_id, "PW_FABRIC_LAKEHOUSE_ID");
        override_option_from_env(&mut fabric.lakehouse_name, "PW_FABRIC_LAKEHOUSE_NAME");

        let logging = &mut self.logging;
        override_from_env(&mut logging.level, "RUST_LOG");
        override_from_env(&mut logging.format, "LOG_FORMAT");
        override_from_env(&mut logging.output, "LOG_OUTPUT");
        override_from_env(&mut logging.directory, "LOG_DIR");
    }

    /// Values the run cannot start without
    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("type", self.source.policy_type.as_str()),
            ("service_principal.tenant_id", self.source.service_principal.tenant_id.as_str()),
            ("service_principal.client_id", self.source.service_principal.client_id.as_str()),
            ("service_principal.client_secret", self.source.service_principal.client_secret.as_str()),
            ("fabric.workspace_id", self.source.fabric.workspace_id.as_str()),
            ("fabric.api_token", self.source.fabric.api_token.as_str()),
        ];

        match required.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(ConfigError::MissingValue(name.to_string())),
            None => Ok(()),
        }
    }
}
