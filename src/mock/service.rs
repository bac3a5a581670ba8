//! Mock time-series store for testing
//!
//! Provides a mock store that accepts the plain-text `put` line protocol over
//! TCP and records every line it receives, for end-to-end testing without a
//! real store.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::info;

/// Mock store state
#[derive(Debug, Default)]
struct MockTsdbState {
    /// Raw lines received, in arrival order, including the `put ` prefix
    received_lines: Vec<String>,
    /// Count of accepted connections
    connections_accepted: u64,
}

/// Mock time-series store for testing
///
/// Binds an ephemeral local port, accepts any number of connections, and
/// records every newline-terminated record it receives.
#[derive(Debug, Clone)]
pub struct MockTsdbServer {
    state: Arc<RwLock<MockTsdbState>>,
}

impl MockTsdbServer {
    /// Create a new mock store
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockTsdbState::default())),
        }
    }

    /// Start the mock store
    ///
    /// Returns the address the store is listening on.
    pub async fn start(&self) -> Result<SocketAddr, String> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| format!("Failed to bind mock store listener: {}", e))?;
        let addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to get mock store local address: {}", e))?;

        let state = self.state.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, _)) => {
                        {
                            let mut state = state.write().await;
                            state.connections_accepted += 1;
                        }
                        let state = state.clone();
                        tokio::spawn(async move {
                            let mut lines = BufReader::new(stream).lines();
                            while let Ok(Some(line)) = lines.next_line().await {
                                let mut state = state.write().await;
                                state.received_lines.push(line);
                            }
                        });
                    }
                    Err(e) => {
                        eprintln!("Mock store accept error: {}", e);
                    }
                }
            }
        });

        info!(addr = %addr, "Mock time-series store started");

        Ok(addr)
    }

    /// Get all lines received so far, in arrival order
    pub async fn received_lines(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.received_lines.clone()
    }

    /// Assert that the expected number of lines were received
    pub async fn assert_lines_received(&self, expected_count: usize) -> Result<(), String> {
        let state = self.state.read().await;
        if state.received_lines.len() != expected_count {
            Err(format!(
                "Expected {} lines, but received {}",
                expected_count,
                state.received_lines.len()
            ))
        } else {
            Ok(())
        }
    }

    /// Wait until the expected number of lines has arrived
    ///
    /// Polls the received buffer until the count is reached or the timeout
    /// elapses, then returns the lines.
    pub async fn wait_for_lines(
        &self,
        expected_count: usize,
        timeout: Duration,
    ) -> Result<Vec<String>, String> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            {
                let state = self.state.read().await;
                if state.received_lines.len() >= expected_count {
                    return Ok(state.received_lines.clone());
                }
            }
            if tokio::time::Instant::now() >= deadline {
                let state = self.state.read().await;
                return Err(format!(
                    "Timed out waiting for {} lines, received {}",
                    expected_count,
                    state.received_lines.len()
                ));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Get the number of connections accepted so far
    pub async fn connections_accepted(&self) -> u64 {
        let state = self.state.read().await;
        state.connections_accepted
    }

    /// Reset the mock store state (for test isolation)
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        *state = MockTsdbState::default();
    }
}

impl Default for MockTsdbServer {
    fn default() -> Self {
        Self::new()
    }
}
