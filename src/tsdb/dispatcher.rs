//! Batch dispatcher
//!
//! Assembles the full, normalized line sequence for one delivered batch. This
//! part is pure: the sink sends the assembled lines afterwards, so a batch
//! that fails to encode sends nothing at all.

use tracing::error;

use crate::error::TsdbEncodeError;
use crate::tsdb::{encoder, normalizer, DataPoint, TaskInfo};

/// Build the provenance tag string for one batch
///
/// `host=<worker_host> port=<worker_port> task-id=<task_id> component-id=<component_id>`
pub fn provenance_tags(task: &TaskInfo) -> String {
    format!(
        "host={} port={} task-id={} component-id={}",
        task.worker_host, task.worker_port, task.task_id, task.component_id
    )
}

/// Assemble the line records for one batch, in batch order
///
/// Encodes every data point with the shared metric-id header, timestamp, and
/// provenance tags, concatenates the results preserving each data point's
/// relative order and mapping entry order, drops empty entries, and
/// normalizes every remaining line.
///
/// An unsupported value shape aborts the whole batch: the offending metric id
/// and value are logged and the error is returned with no partial result.
pub fn lines_for_batch(
    header: &str,
    task: &TaskInfo,
    datapoints: &[DataPoint],
) -> Result<Vec<String>, TsdbEncodeError> {
    let timestamp = task.timestamp.to_string();
    let tags = provenance_tags(task);

    let mut lines = Vec::with_capacity(datapoints.len());
    for dp in datapoints {
        let encoded = encoder::encode(header, &timestamp, &tags, dp).map_err(|e| {
            error!(error = %e, "Data point has unsupported value shape, aborting batch");
            e
        })?;
        lines.extend(encoded);
    }

    Ok(lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| normalizer::normalize(&line))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsdb::{MetricValue, ScalarValue};
    use serde_json::json;

    fn task() -> TaskInfo {
        TaskInfo {
            timestamp: 1000,
            worker_host: "h".to_string(),
            worker_port: 1,
            task_id: 2,
            component_id: "c".to_string(),
        }
    }

    #[test]
    fn test_provenance_tags_field_order() {
        assert_eq!(
            provenance_tags(&task()),
            "host=h port=1 task-id=2 component-id=c"
        );
    }

    #[test]
    fn test_batch_order_is_preserved() {
        let datapoints = vec![
            DataPoint::scalar("a", 1),
            DataPoint::mapping(
                "m",
                vec![
                    ("x".to_string(), ScalarValue::Integer(2)),
                    ("y".to_string(), ScalarValue::Integer(3)),
                ],
            ),
            DataPoint::scalar("z", 4),
        ];
        let lines = lines_for_batch("p.t", &task(), &datapoints).unwrap();
        assert_eq!(
            lines,
            vec![
                "p.t.a 1000 1 host=h port=1 task-id=2 component-id=c",
                "p.t.m.x 1000 2 host=h port=1 task-id=2 component-id=c",
                "p.t.m.y 1000 3 host=h port=1 task-id=2 component-id=c",
                "p.t.z 1000 4 host=h port=1 task-id=2 component-id=c",
            ]
        );
    }

    #[test]
    fn test_empty_mapping_contributes_nothing() {
        let datapoints = vec![
            DataPoint::mapping("empty", vec![]),
            DataPoint::scalar("a", 1),
        ];
        let lines = lines_for_batch("p.t", &task(), &datapoints).unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_lines_are_normalized() {
        let datapoints = vec![DataPoint::scalar("partition_7/offset", 42)];
        let lines = lines_for_batch("p.t", &task(), &datapoints).unwrap();
        assert_eq!(
            lines,
            vec!["p.t.offset 1000 42 host=h port=1 task-id=2 component-id=c partition=7"]
        );
    }

    #[test]
    fn test_unsupported_value_aborts_whole_batch() {
        let datapoints = vec![
            DataPoint::scalar("good", 1),
            DataPoint::new("bad", MetricValue::classify(json!([1]))),
            DataPoint::scalar("later", 2),
        ];
        assert!(lines_for_batch("p.t", &task(), &datapoints).is_err());
    }

    #[test]
    fn test_empty_batch_yields_no_lines() {
        assert!(lines_for_batch("p.t", &task(), &[]).unwrap().is_empty());
    }
}
