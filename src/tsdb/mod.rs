//! Time-series store (TSDB) module
//!
//! Provides the metric sample data model, line-record encoding, name
//! normalization, batch dispatch, and the store connection.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A directly stringifiable primitive sample value
///
/// Rendered into a line record exactly as `Display` prints it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// UTF-8 string
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Integer(v) => write!(f, "{}", v),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::Boolean(v) => write!(f, "{}", v),
            ScalarValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl ScalarValue {
    /// Extract a scalar from a JSON value, or `None` for composite shapes
    fn from_json(value: &serde_json::Value) -> Option<ScalarValue> {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(ScalarValue::Integer(i))
                } else {
                    n.as_f64().map(ScalarValue::Float)
                }
            }
            serde_json::Value::Bool(b) => Some(ScalarValue::Boolean(*b)),
            serde_json::Value::String(s) => Some(ScalarValue::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Integer(v)
    }
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        ScalarValue::Integer(v as i64)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Float(v)
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Boolean(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::Text(v.to_string())
    }
}

/// A metric sample value, classified once at the boundary where samples enter
/// the sink
///
/// Values arriving from producers are sorted into exactly one of three shapes.
/// The encoder dispatches on the variant; no further shape inspection happens
/// downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// A single primitive value
    Scalar(ScalarValue),
    /// A flat mapping of scalar sub-values, entry order preserved
    Mapping(Vec<(String, ScalarValue)>),
    /// Any other shape (arrays, nested objects, null); carries the offending value
    Unsupported(serde_json::Value),
}

impl MetricValue {
    /// Classify a JSON value into a metric value
    ///
    /// Numbers, booleans, and strings become [`MetricValue::Scalar`]. An
    /// object whose members are all scalars becomes [`MetricValue::Mapping`]
    /// with entries in the object's order. Everything else, including an
    /// object with a nested composite member, becomes
    /// [`MetricValue::Unsupported`].
    pub fn classify(value: serde_json::Value) -> Self {
        if let Some(scalar) = ScalarValue::from_json(&value) {
            return MetricValue::Scalar(scalar);
        }

        if let serde_json::Value::Object(ref entries) = value {
            let mut mapping = Vec::with_capacity(entries.len());
            for (key, member) in entries {
                match ScalarValue::from_json(member) {
                    Some(scalar) => mapping.push((key.clone(), scalar)),
                    None => {
                        mapping.clear();
                        break;
                    }
                }
            }
            if mapping.len() == entries.len() {
                return MetricValue::Mapping(mapping);
            }
        }

        MetricValue::Unsupported(value)
    }
}

impl From<serde_json::Value> for MetricValue {
    fn from(value: serde_json::Value) -> Self {
        MetricValue::classify(value)
    }
}

impl Serialize for MetricValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MetricValue::Scalar(v) => v.serialize(serializer),
            MetricValue::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            MetricValue::Unsupported(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for MetricValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(MetricValue::classify(value))
    }
}

/// One named metric sample
///
/// Produced externally by instrumented tasks, immutable, consumed once per
/// batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Metric name, appended to the per-topology metric-id header
    pub name: String,
    /// Sample value
    pub value: MetricValue,
}

impl DataPoint {
    /// Create a data point from an already-classified value
    pub fn new(name: impl Into<String>, value: MetricValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Create a scalar-valued data point
    pub fn scalar(name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self::new(name, MetricValue::Scalar(value.into()))
    }

    /// Create a mapping-valued data point, entry order preserved
    pub fn mapping(
        name: impl Into<String>,
        entries: Vec<(String, ScalarValue)>,
    ) -> Self {
        Self::new(name, MetricValue::Mapping(entries))
    }
}

/// Provenance of one delivered batch
///
/// Supplied by the host runtime, one instance per batch, read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// Batch timestamp in epoch seconds
    pub timestamp: i64,
    /// Hostname of the worker that produced the batch
    pub worker_host: String,
    /// Port of the worker that produced the batch
    pub worker_port: u16,
    /// Task id within the topology (negative for system-level tasks)
    pub task_id: i32,
    /// Component id the task belongs to
    pub component_id: String,
}

pub mod connection;
pub mod dispatcher;
pub mod encoder;
pub mod normalizer;

pub use connection::{ConnectionState, TsdbConnection};
