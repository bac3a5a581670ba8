//! Metric sample encoder
//!
//! Turns one `(metric-id prefix, timestamp, tags, DataPoint)` tuple into zero
//! or more flat line records of the form
//! `<metric.id.path> <timestamp> <value> <tags>`. Pure; the transport prefix
//! (`put `) and terminator are added by the connection at send time.

use crate::error::TsdbEncodeError;
use crate::tsdb::{DataPoint, MetricValue};

/// Encode one data point into line records
///
/// The metric id is `<prefix>.<name>`. A scalar value yields exactly one
/// line; a mapping yields one line per entry, named `<metric-id>.<key>`, in
/// the mapping's entry order; an empty mapping yields no lines and is not an
/// error. An unsupported value shape fails with the offending metric id and
/// value and produces no partial result.
pub fn encode(
    prefix: &str,
    timestamp: &str,
    tags: &str,
    dp: &DataPoint,
) -> Result<Vec<String>, TsdbEncodeError> {
    let metric_id = format!("{}.{}", prefix, dp.name);

    match &dp.value {
        MetricValue::Scalar(value) => {
            Ok(vec![format!("{} {} {} {}", metric_id, timestamp, value, tags)])
        }
        MetricValue::Mapping(entries) => Ok(entries
            .iter()
            .map(|(key, value)| {
                format!("{}.{} {} {} {}", metric_id, key, timestamp, value, tags)
            })
            .collect()),
        MetricValue::Unsupported(raw) => Err(TsdbEncodeError::UnsupportedValue {
            metric_id,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsdb::ScalarValue;
    use serde_json::json;

    const TAGS: &str = "host=h port=1 task-id=2 component-id=c";

    #[test]
    fn test_scalar_yields_one_line_in_field_order() {
        let dp = DataPoint::scalar("requests", 5);
        let lines = encode("storm.metrics.topoA", "1000", TAGS, &dp).unwrap();
        assert_eq!(
            lines,
            vec!["storm.metrics.topoA.requests 1000 5 host=h port=1 task-id=2 component-id=c"]
        );
    }

    #[test]
    fn test_float_scalar() {
        let dp = DataPoint::scalar("load", 0.75);
        let lines = encode("p", "10", TAGS, &dp).unwrap();
        assert_eq!(lines, vec![format!("p.load 10 0.75 {}", TAGS)]);
    }

    #[test]
    fn test_mapping_yields_one_line_per_entry_in_order() {
        let dp = DataPoint::mapping(
            "latency",
            vec![
                ("p99".to_string(), ScalarValue::Integer(80)),
                ("p50".to_string(), ScalarValue::Integer(12)),
            ],
        );
        let lines = encode("p", "10", TAGS, &dp).unwrap();
        assert_eq!(
            lines,
            vec![
                format!("p.latency.p99 10 80 {}", TAGS),
                format!("p.latency.p50 10 12 {}", TAGS),
            ]
        );
    }

    #[test]
    fn test_empty_mapping_yields_no_lines() {
        let dp = DataPoint::mapping("empty", vec![]);
        let lines = encode("p", "10", TAGS, &dp).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_unsupported_shape_fails_with_metric_id_and_value() {
        let dp = DataPoint::new("bad", MetricValue::classify(json!([1, 2])));
        let err = encode("p", "10", TAGS, &dp).unwrap_err();
        match err {
            TsdbEncodeError::UnsupportedValue { metric_id, value } => {
                assert_eq!(metric_id, "p.bad");
                assert_eq!(value, "[1,2]");
            }
        }
    }
}
