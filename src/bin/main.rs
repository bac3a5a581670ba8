//! Standalone OpenTSDB Sink Service
//!
//! Runs as a standalone bridge that reads newline-delimited JSON metric
//! batches on stdin and forwards them to the time-series store. Useful for
//! driving the sink from a host runtime's shell-based multilang interface or
//! for replaying captured batches.
//!
//! Each input line is one batch:
//!
//! ```json
//! {"task_info": {"timestamp": 1000, "worker_host": "w1", "worker_port": 6700,
//!                "task_id": 2, "component_id": "spout"},
//!  "datapoints": [{"name": "requests", "value": 5}]}
//! ```
//!
//! A missing `timestamp` defaults to the current epoch second.

use opentsdb_sink_library::{ConfigLoader, DataPoint, TaskInfo, TsdbSink};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

/// One batch as it arrives on stdin
#[derive(Debug, Deserialize)]
struct StdinBatch {
    task_info: StdinTaskInfo,
    datapoints: Vec<DataPoint>,
}

/// Batch provenance with an optional timestamp
#[derive(Debug, Deserialize)]
struct StdinTaskInfo {
    #[serde(default)]
    timestamp: Option<i64>,
    worker_host: String,
    worker_port: u16,
    task_id: i32,
    component_id: String,
}

impl StdinTaskInfo {
    fn into_task_info(self) -> TaskInfo {
        TaskInfo {
            timestamp: self
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().timestamp()),
            worker_host: self.worker_host,
            worker_port: self.worker_port,
            task_id: self.task_id,
            component_id: self.component_id,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    // Load configuration: explicit YAML file if given, environment otherwise
    let config = match std::env::var("TSD_SINK_CONFIG") {
        Ok(path) => ConfigLoader::from_yaml(path)?,
        Err(_) => ConfigLoader::from_env()?,
    };

    let topology_name =
        std::env::var("TOPOLOGY_NAME").unwrap_or_else(|_| "default".to_string());

    let sink = TsdbSink::prepare(&topology_name, config).await?;

    info!(
        topology_name = %topology_name,
        metric_id_header = %sink.metric_id_header(),
        "OpenTSDB sink service started, reading batches from stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let batch: StdinBatch = match serde_json::from_str(&line) {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, "Skipping malformed batch");
                continue;
            }
        };

        let task = batch.task_info.into_task_info();
        if let Err(e) = sink.handle_batch(&task, &batch.datapoints).await {
            // No local recovery; surface the failure and let the host restart us.
            error!(error = %e, "Failed to forward batch");
            sink.shutdown().await.ok();
            return Err(e.into());
        }
    }

    info!("Input exhausted, shutting down");
    sink.shutdown().await?;

    Ok(())
}
