//! Configuration module
//!
//! Provides configuration management for the OpenTSDB sink library including
//! loading from YAML files, environment variables, the host's registration
//! mapping, and a programmatic API.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{ConfigBuilder, SinkConfig};
