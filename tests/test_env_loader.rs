//! Unit tests for environment variable configuration loading

use opentsdb_sink_library::config::ConfigLoader;
use opentsdb_sink_library::error::TsdbConfigError;
use std::sync::Mutex;

// Mutex to serialize environment variable access across parallel tests
// Environment variables are process-wide, so parallel tests can interfere with each other
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clear all sink-related environment variables
fn clear_tsd_env_vars() {
    // SAFETY: all env-mutating tests hold ENV_MUTEX
    unsafe {
        std::env::remove_var("TSD_HOST");
        std::env::remove_var("TSD_PORT");
        std::env::remove_var("TSD_PREFIX");
    }
}

/// Set an environment variable under the ENV_MUTEX
fn set_env_var(key: &str, value: &str) {
    // SAFETY: all env-mutating tests hold ENV_MUTEX
    unsafe {
        std::env::set_var(key, value);
    }
}

#[test]
fn test_load_from_env_with_all_vars() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_tsd_env_vars();

    set_env_var("TSD_HOST", "tsd.example.com");
    set_env_var("TSD_PORT", "4243");
    set_env_var("TSD_PREFIX", "env.metrics.");

    let config = ConfigLoader::from_env().unwrap();

    assert_eq!(config.tsd_host, "tsd.example.com");
    assert_eq!(config.tsd_port, 4243);
    assert_eq!(config.tsd_prefix, "env.metrics.");

    clear_tsd_env_vars();
}

#[test]
fn test_load_from_env_with_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_tsd_env_vars();

    // Only set the required host, others should use defaults
    set_env_var("TSD_HOST", "tsd.example.com");

    let config = ConfigLoader::from_env().unwrap();

    assert_eq!(config.tsd_host, "tsd.example.com");
    assert_eq!(config.tsd_port, 4242); // default
    assert_eq!(config.tsd_prefix, "storm.metrics."); // default

    clear_tsd_env_vars();
}

#[test]
fn test_load_from_env_without_host_fails() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_tsd_env_vars();

    let result = ConfigLoader::from_env();

    assert!(matches!(
        result,
        Err(TsdbConfigError::MissingRequiredField(_))
    ));

    clear_tsd_env_vars();
}

#[test]
fn test_load_from_env_with_invalid_port() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_tsd_env_vars();

    set_env_var("TSD_HOST", "tsd.example.com");
    set_env_var("TSD_PORT", "not_a_number");

    // Invalid parse is ignored, default port survives validation
    let config = ConfigLoader::from_env().unwrap();
    assert_eq!(config.tsd_port, 4242);

    clear_tsd_env_vars();
}

#[test]
fn test_env_var_priority_over_provided_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    clear_tsd_env_vars();

    // Create a config with specific values
    let provided_config = opentsdb_sink_library::config::ConfigBuilder::new()
        .tsd_host("provided.example.com")
        .tsd_port(5000)
        .build()
        .unwrap();

    // Set environment variable
    set_env_var("TSD_PORT", "6000");

    // Load with provided config - env should override
    let config = ConfigLoader::load(Some(provided_config)).unwrap();

    // Environment variable should override provided config
    assert_eq!(config.tsd_port, 6000);
    // But the host from the provided config should be used (env not set)
    assert_eq!(config.tsd_host, "provided.example.com");

    clear_tsd_env_vars();
}
