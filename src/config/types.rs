//! Configuration type definitions
//!
//! Defines the sink configuration structure and its programmatic builder.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::TsdbConfigError;

/// Sink configuration
///
/// Describes how to reach the downstream time-series store and which metric-id
/// prefix to apply. Constructed once at startup from the host's registration
/// mapping, a YAML file, environment variables, or the programmatic builder;
/// immutable thereafter.
///
/// # Configuration Sources
///
/// - The host's registration mapping ([`SinkConfig::from_registration`])
/// - YAML files ([`crate::config::ConfigLoader::from_yaml`])
/// - Environment variables (`TSD_HOST`, `TSD_PORT`, `TSD_PREFIX`)
/// - Programmatic API ([`ConfigBuilder`])
///
/// # Default Values
///
/// - `tsd_host`: none (required)
/// - `tsd_port`: `4242`
/// - `tsd_prefix`: `"storm.metrics."`
///
/// # Example
///
/// ```no_run
/// use opentsdb_sink_library::ConfigBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConfigBuilder::new()
///     .tsd_host("tsd.example.com")
///     .tsd_port(4242)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SinkConfig {
    /// Hostname or address of the time-series store (required)
    #[serde(default)]
    pub tsd_host: String,

    /// TCP port of the time-series store (default: 4242)
    #[serde(default = "default_tsd_port")]
    pub tsd_port: u16,

    /// Prefix prepended to every metric id (default: "storm.metrics.")
    #[serde(default = "default_tsd_prefix")]
    pub tsd_prefix: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            tsd_host: String::new(),
            tsd_port: default_tsd_port(),
            tsd_prefix: default_tsd_prefix(),
        }
    }
}

impl SinkConfig {
    /// Build a registration mapping from `(host, port, prefix)`
    ///
    /// Convenience helper producing the argument mapping the host runtime
    /// passes back at registration time. Purely a builder, no validation.
    pub fn registration_args(
        host: &str,
        port: u16,
        prefix: &str,
    ) -> HashMap<String, serde_json::Value> {
        let mut args = HashMap::new();
        args.insert("tsd_host".to_string(), serde_json::Value::from(host));
        args.insert("tsd_port".to_string(), serde_json::Value::from(port));
        args.insert("tsd_prefix".to_string(), serde_json::Value::from(prefix));
        args
    }

    /// Construct a configuration from the host's registration mapping
    ///
    /// Missing `tsd_port` and `tsd_prefix` keys fall back to their defaults;
    /// a missing `tsd_host` fails validation.
    pub fn from_registration(
        args: &HashMap<String, serde_json::Value>,
    ) -> Result<Self, TsdbConfigError> {
        let value = serde_json::to_value(args)
            .map_err(|e| TsdbConfigError::ValidationFailed(e.to_string()))?;
        let config: SinkConfig = serde_json::from_value(value).map_err(|e| {
            TsdbConfigError::ValidationFailed(format!("Invalid registration mapping: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The metric-id prefix with exactly one trailing `'.'`
    ///
    /// This is the form used for metric-id header construction regardless of
    /// how many trailing dots the configured value carries.
    pub fn normalized_prefix(&self) -> String {
        format!("{}.", self.tsd_prefix.trim_end_matches('.'))
    }

    /// Compute the per-topology metric-id header: `normalized_prefix + topology_name`
    pub fn metric_id_header(&self, topology_name: &str) -> String {
        format!("{}{}", self.normalized_prefix(), topology_name)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), TsdbConfigError> {
        if self.tsd_host.is_empty() {
            return Err(TsdbConfigError::MissingRequiredField(
                "tsd_host".to_string(),
            ));
        }

        if self.tsd_port == 0 {
            return Err(TsdbConfigError::InvalidPort(
                "Store port must be between 1 and 65535".to_string(),
            ));
        }

        if self.tsd_prefix.trim_end_matches('.').is_empty() {
            return Err(TsdbConfigError::InvalidPrefix(
                "Metric prefix cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for creating configurations programmatically
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: SinkConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: SinkConfig::default(),
        }
    }

    /// Set the store hostname
    pub fn tsd_host(mut self, host: impl Into<String>) -> Self {
        self.config.tsd_host = host.into();
        self
    }

    /// Set the store port
    pub fn tsd_port(mut self, port: u16) -> Self {
        self.config.tsd_port = port;
        self
    }

    /// Set the metric-id prefix
    pub fn tsd_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.tsd_prefix = prefix.into();
        self
    }

    /// Build the configuration with validation
    pub fn build(self) -> Result<SinkConfig, TsdbConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// Default value functions
fn default_tsd_port() -> u16 {
    4242
}

fn default_tsd_prefix() -> String {
    "storm.metrics.".to_string()
}
