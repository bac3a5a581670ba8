//! Configuration loader
//!
//! Loads configuration from YAML files, environment variables, or programmatic API.
//! Priority: provided config > environment variables > defaults

use std::env;

use crate::config::types::SinkConfig;
use crate::error::TsdbConfigError;
use tracing::{debug, info, warn};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from YAML file
    pub fn from_yaml(path: impl AsRef<std::path::Path>) -> Result<SinkConfig, TsdbConfigError> {
        let path = path.as_ref();
        info!(
            config_path = %path.display(),
            "Loading configuration from YAML file"
        );

        let content = std::fs::read_to_string(path).map_err(|e| {
            warn!(
                config_path = %path.display(),
                error = %e,
                "Failed to read configuration file"
            );
            TsdbConfigError::ValidationFailed(format!("Failed to read config file: {}", e))
        })?;

        let mut config: SinkConfig = serde_yaml::from_str(&content).map_err(|e| {
            warn!(
                config_path = %path.display(),
                error = %e,
                "Failed to parse YAML configuration"
            );
            TsdbConfigError::ValidationFailed(format!("Failed to parse YAML: {}", e))
        })?;

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut config);

        // Validate configuration
        config.validate().map_err(|e| {
            warn!(
                config_path = %path.display(),
                error = %e,
                "Configuration validation failed"
            );
            e
        })?;

        info!(
            config_path = %path.display(),
            tsd_host = %config.tsd_host,
            tsd_port = config.tsd_port,
            tsd_prefix = %config.tsd_prefix,
            "Configuration loaded and validated successfully"
        );

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<SinkConfig, TsdbConfigError> {
        info!("Loading configuration from environment variables");

        let mut config = SinkConfig::default();

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut config);

        // Validate configuration
        config.validate().map_err(|e| {
            warn!(
                error = %e,
                "Configuration validation failed"
            );
            e
        })?;

        info!(
            tsd_host = %config.tsd_host,
            tsd_port = config.tsd_port,
            tsd_prefix = %config.tsd_prefix,
            "Configuration loaded from environment variables and validated successfully"
        );

        Ok(config)
    }

    /// Load configuration with priority: provided config > environment variables > defaults
    pub fn load(provided: Option<SinkConfig>) -> Result<SinkConfig, TsdbConfigError> {
        if provided.is_some() {
            info!("Loading configuration with provided config and environment variable overrides");
        } else {
            info!("Loading configuration with defaults and environment variable overrides");
        }

        let mut config = provided.unwrap_or_default();

        // Apply environment variable overrides (they override provided config)
        Self::apply_env_overrides(&mut config);

        // Validate configuration
        config.validate().map_err(|e| {
            warn!(
                error = %e,
                "Configuration validation failed"
            );
            e
        })?;

        info!(
            tsd_host = %config.tsd_host,
            tsd_port = config.tsd_port,
            tsd_prefix = %config.tsd_prefix,
            "Configuration loaded and validated successfully"
        );

        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut SinkConfig) {
        // TSD_HOST
        if let Ok(host) = env::var("TSD_HOST") {
            debug!(
                env_var = "TSD_HOST",
                value = %host,
                "Applying environment variable override"
            );
            config.tsd_host = host;
        }

        // TSD_PORT
        if let Ok(port) = env::var("TSD_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(
                        env_var = "TSD_PORT",
                        value = p,
                        "Applying environment variable override"
                    );
                    config.tsd_port = p;
                }
                Err(e) => {
                    warn!(
                        env_var = "TSD_PORT",
                        value = %port,
                        error = %e,
                        "Failed to parse environment variable, using default"
                    );
                }
            }
        }

        // TSD_PREFIX
        if let Ok(prefix) = env::var("TSD_PREFIX") {
            debug!(
                env_var = "TSD_PREFIX",
                value = %prefix,
                "Applying environment variable override"
            );
            config.tsd_prefix = prefix;
        }
    }
}
