//! Connection manager for the time-series store
//!
//! Owns the single outbound TCP connection the sink writes line records to.
//! No pooling and no reconnect loop: a failed connect is fatal to the sink
//! instance and a mid-stream write failure propagates to the batch caller.

use std::net::SocketAddr;

use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::error::TsdbConnectionError;

/// An exclusively-owned text-stream connection to the store
///
/// The socket and its write buffer live and die together: constructing a
/// `TsdbConnection` means both are open, and [`TsdbConnection::disconnect`]
/// consumes the value, so a half-open socket/writer pair cannot exist.
#[derive(Debug)]
pub struct TsdbConnection {
    writer: BufWriter<TcpStream>,
    peer: SocketAddr,
}

impl TsdbConnection {
    /// Open a TCP connection to the store
    ///
    /// Fails with [`TsdbConnectionError::ConnectFailed`] if the host is
    /// unreachable or refuses the connection. There is no timeout: a wedged
    /// store blocks the awaiting caller.
    pub async fn connect(host: &str, port: u16) -> Result<Self, TsdbConnectionError> {
        let stream = TcpStream::connect((host, port)).await.map_err(|e| {
            TsdbConnectionError::ConnectFailed(format!("{}:{}: {}", host, port, e))
        })?;

        let peer = stream.peer_addr().map_err(|e| {
            TsdbConnectionError::ConnectFailed(format!("{}:{}: {}", host, port, e))
        })?;

        info!(peer = %peer, "Connected to time-series store");

        Ok(Self {
            writer: BufWriter::new(stream),
            peer,
        })
    }

    /// Send one line record to the store
    ///
    /// Writes `put <line>\n` and flushes immediately; nothing is buffered
    /// across calls. A write or flush failure propagates unchanged and is not
    /// retried.
    pub async fn send(&mut self, line: &str) -> Result<(), std::io::Error> {
        self.writer.write_all(b"put ").await?;
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Close the connection
    ///
    /// Flushes any pending bytes and shuts the socket down. Consumes the
    /// connection; closing twice is unrepresentable.
    pub async fn disconnect(mut self) -> Result<(), std::io::Error> {
        self.writer.flush().await?;
        self.writer.get_mut().shutdown().await?;
        debug!(peer = %self.peer, "Disconnected from time-series store");
        Ok(())
    }

    /// Address of the store this connection writes to
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

/// Connection lifecycle state
///
/// The transient connecting phase exists only inside
/// [`TsdbConnection::connect`]; observable state is either fully established
/// or fully torn down.
#[derive(Debug)]
pub enum ConnectionState {
    /// No connection is established
    Disconnected,
    /// A fully established connection
    Connected(TsdbConnection),
}

impl ConnectionState {
    /// Whether a connection is currently established
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }
}
