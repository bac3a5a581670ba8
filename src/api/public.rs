//! Public API for embedded sink usage
//!
//! Provides the sink instance the host runtime drives through its startup,
//! batch-handling, and shutdown callbacks.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::SinkConfig;
use crate::error::{TsdbConnectionError, TsdbError};
use crate::tsdb::{dispatcher, ConnectionState, DataPoint, TaskInfo, TsdbConnection};

/// Metric sink instance forwarding topology batches to the time-series store
///
/// One instance per registered sink. The host runtime is expected to call
/// [`TsdbSink::prepare`] once, deliver batches through
/// [`TsdbSink::handle_batch`], and finish with [`TsdbSink::shutdown`].
///
/// Concurrent `handle_batch` calls are safe: the connection sits behind a
/// mutex that is held for a whole batch, so lines from different batches are
/// never interleaved on the wire.
///
/// # Example
///
/// ```no_run
/// use opentsdb_sink_library::{ConfigBuilder, DataPoint, TaskInfo, TsdbSink};
///
/// # async fn example() -> Result<(), opentsdb_sink_library::TsdbError> {
/// let config = ConfigBuilder::new().tsd_host("tsd.example.com").build()?;
/// let sink = TsdbSink::prepare("topoA", config).await?;
///
/// let task = TaskInfo {
///     timestamp: 1000,
///     worker_host: "worker-1".to_string(),
///     worker_port: 6700,
///     task_id: 2,
///     component_id: "spout".to_string(),
/// };
/// sink.handle_batch(&task, &[DataPoint::scalar("requests", 5)]).await?;
///
/// sink.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct TsdbSink {
    config: SinkConfig,
    metric_id_header: String,
    connection: Arc<Mutex<ConnectionState>>,
}

impl TsdbSink {
    /// Start the sink: validate configuration, derive the metric-id header,
    /// and connect to the store
    ///
    /// The metric-id header is `normalized prefix + topology name`, computed
    /// here once and prepended to every metric id for the lifetime of the
    /// sink.
    ///
    /// # Errors
    ///
    /// Returns `Err(TsdbError)` if the configuration is invalid or the store
    /// is unreachable. There is no retry loop; the host decides how to react.
    pub async fn prepare(topology_name: &str, config: SinkConfig) -> Result<Self, TsdbError> {
        config.validate()?;

        let metric_id_header = config.metric_id_header(topology_name);
        let connection = TsdbConnection::connect(&config.tsd_host, config.tsd_port).await?;

        info!(
            metric_id_header = %metric_id_header,
            tsd_host = %config.tsd_host,
            tsd_port = config.tsd_port,
            "Metric sink ready"
        );

        Ok(Self {
            config,
            metric_id_header,
            connection: Arc::new(Mutex::new(ConnectionState::Connected(connection))),
        })
    }

    /// Create a configuration builder for programmatic configuration
    pub fn with_config_builder() -> crate::config::ConfigBuilder {
        crate::config::ConfigBuilder::new()
    }

    /// Forward one delivered batch to the store
    ///
    /// Encodes every data point with the batch's timestamp and provenance
    /// tags, normalizes the resulting lines, and sends them in order. A batch
    /// produces between zero and N lines, where N is the number of scalar
    /// points plus the total mapping entries.
    ///
    /// # Errors
    ///
    /// - An unsupported value shape aborts the whole batch before anything is
    ///   sent and returns `TsdbError::Encode`.
    /// - A write failure returns `TsdbError::Io`; it is not retried and the
    ///   connection is left as-is for the host to decide.
    /// - Calling after shutdown returns `TsdbError::Connection(NotConnected)`.
    pub async fn handle_batch(
        &self,
        task: &TaskInfo,
        datapoints: &[DataPoint],
    ) -> Result<(), TsdbError> {
        let lines = dispatcher::lines_for_batch(&self.metric_id_header, task, datapoints)?;
        if lines.is_empty() {
            return Ok(());
        }

        let mut state = self.connection.lock().await;
        let connection = match &mut *state {
            ConnectionState::Connected(connection) => connection,
            ConnectionState::Disconnected => {
                return Err(TsdbConnectionError::NotConnected.into());
            }
        };

        for line in &lines {
            connection.send(line).await?;
        }

        debug!(
            task_id = task.task_id,
            component_id = %task.component_id,
            lines = lines.len(),
            "Forwarded batch to time-series store"
        );

        Ok(())
    }

    /// Shut the sink down, closing the store connection
    ///
    /// Safe to call when no connection is established, and therefore safe to
    /// call more than once.
    pub async fn shutdown(&self) -> Result<(), TsdbError> {
        let mut state = self.connection.lock().await;
        match std::mem::replace(&mut *state, ConnectionState::Disconnected) {
            ConnectionState::Connected(connection) => {
                connection.disconnect().await?;
                info!("Metric sink shutdown complete");
            }
            ConnectionState::Disconnected => {}
        }
        Ok(())
    }

    /// Whether the store connection is currently established
    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_connected()
    }

    /// Get a reference to the sink's configuration
    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// The per-topology prefix prepended to every metric id
    pub fn metric_id_header(&self) -> &str {
        &self.metric_id_header
    }
}
