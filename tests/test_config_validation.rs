//! Unit tests for configuration validation

use opentsdb_sink_library::config::ConfigBuilder;
use opentsdb_sink_library::error::TsdbConfigError;
use opentsdb_sink_library::SinkConfig;

#[test]
fn test_valid_config_passes_validation() {
    let config = ConfigBuilder::new()
        .tsd_host("tsd.example.com")
        .tsd_port(4242)
        .tsd_prefix("storm.metrics.")
        .build()
        .unwrap();

    // Should not panic and return Ok
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_host_fails_validation() {
    let config = ConfigBuilder::new().build();

    assert!(config.is_err());
    match config.unwrap_err() {
        TsdbConfigError::MissingRequiredField(field) => assert_eq!(field, "tsd_host"),
        _ => panic!("Expected MissingRequiredField error"),
    }
}

#[test]
fn test_zero_port_fails_validation() {
    let config = ConfigBuilder::new().tsd_host("tsd").tsd_port(0).build();

    assert!(config.is_err());
    match config.unwrap_err() {
        TsdbConfigError::InvalidPort(_) => {}
        _ => panic!("Expected InvalidPort error"),
    }
}

#[test]
fn test_dots_only_prefix_fails_validation() {
    let config = ConfigBuilder::new()
        .tsd_host("tsd")
        .tsd_prefix("...")
        .build();

    assert!(config.is_err());
    match config.unwrap_err() {
        TsdbConfigError::InvalidPrefix(_) => {}
        _ => panic!("Expected InvalidPrefix error"),
    }
}

#[test]
fn test_defaults() {
    let config = ConfigBuilder::new().tsd_host("tsd").build().unwrap();

    assert_eq!(config.tsd_port, 4242);
    assert_eq!(config.tsd_prefix, "storm.metrics.");
}

#[test]
fn test_prefix_without_trailing_dot_is_normalized() {
    let config = ConfigBuilder::new()
        .tsd_host("tsd")
        .tsd_prefix("foo")
        .build()
        .unwrap();

    assert_eq!(config.normalized_prefix(), "foo.");
    assert_eq!(config.metric_id_header("topoA"), "foo.topoA");
}

#[test]
fn test_prefix_with_extra_trailing_dots_is_normalized() {
    let config = ConfigBuilder::new()
        .tsd_host("tsd")
        .tsd_prefix("foo...")
        .build()
        .unwrap();

    assert_eq!(config.normalized_prefix(), "foo.");
}

#[test]
fn test_default_prefix_already_normalized() {
    let config = ConfigBuilder::new().tsd_host("tsd").build().unwrap();

    assert_eq!(config.normalized_prefix(), "storm.metrics.");
    assert_eq!(
        config.metric_id_header("topoA"),
        "storm.metrics.topoA"
    );
}

#[test]
fn test_registration_args_round_trip() {
    let args = SinkConfig::registration_args("tsd.example.com", 4243, "metrics");
    let config = SinkConfig::from_registration(&args).unwrap();

    assert_eq!(config.tsd_host, "tsd.example.com");
    assert_eq!(config.tsd_port, 4243);
    assert_eq!(config.tsd_prefix, "metrics");
}

#[test]
fn test_registration_mapping_defaults_for_missing_keys() {
    let mut args = std::collections::HashMap::new();
    args.insert(
        "tsd_host".to_string(),
        serde_json::Value::from("tsd.example.com"),
    );

    let config = SinkConfig::from_registration(&args).unwrap();

    assert_eq!(config.tsd_host, "tsd.example.com");
    assert_eq!(config.tsd_port, 4242);
    assert_eq!(config.tsd_prefix, "storm.metrics.");
}

#[test]
fn test_registration_mapping_without_host_fails() {
    let args = std::collections::HashMap::new();

    let result = SinkConfig::from_registration(&args);
    assert!(matches!(
        result,
        Err(TsdbConfigError::MissingRequiredField(_))
    ));
}
