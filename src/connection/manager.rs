//! Connection Manager Implementation

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::error::{TransportError, TransportResult};
use super::network::{Network, SuplSocket, SystemNetwork};
use super::{DEFAULT_READ_TIMEOUT, DEFAULT_SUPL_PORT, DEFAULT_SUPL_SERVER};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::engine::DEFAULT_MESSAGE_CAPACITY;

/// Server identity and socket options for one connection context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub read_timeout: Duration,
    /// `None` leaves connect fully blocking
    pub connect_timeout: Option<Duration>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SUPL_SERVER.to_string(),
            port: DEFAULT_SUPL_PORT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            connect_timeout: None,
        }
    }
}

/// Result of a single receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes placed at the front of the buffer; 0 means the peer closed
    Data(usize),
    /// Nothing arrived before the receive timeout expired
    Timeout,
}

/// Owns the single outbound TCP connection to a SUPL server
pub struct SuplConnection<N: Network, S: DiagnosticSink> {
    network: N,
    sink: S,
    settings: ConnectionSettings,
    message_capacity: usize,
    socket: Option<N::Socket>,
    peer: Option<SocketAddr>,
}

impl SuplConnection<SystemNetwork, TracingSink> {
    /// Connection context on host sockets reporting through `tracing`
    pub fn system(settings: ConnectionSettings) -> Self {
        Self::new(SystemNetwork, TracingSink, settings)
    }
}

impl<N: Network, S: DiagnosticSink> SuplConnection<N, S> {
    /// Create an unopened connection context
    pub fn new(network: N, sink: S, settings: ConnectionSettings) -> Self {
        Self {
            network,
            sink,
            settings,
            message_capacity: DEFAULT_MESSAGE_CAPACITY,
            socket: None,
            peer: None,
        }
    }

    /// Set the buffer size used by the engine log callback
    pub fn with_message_capacity(mut self, capacity: usize) -> Self {
        self.message_capacity = capacity;
        self
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn message_capacity(&self) -> usize {
        self.message_capacity
    }

    /// Whether a connection is currently live
    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    /// Address of the connected candidate
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Resolve the server and connect to the first candidate that accepts.
    ///
    /// Candidates are tried in resolver order. Socket creation and option
    /// failures abort the whole attempt; a failed connect moves on to the
    /// next candidate.
    #[instrument(skip(self))]
    pub fn open(&mut self) -> TransportResult<SocketAddr> {
        if self.socket.is_some() {
            self.sink.error("SUPL connection already open");
            return Err(TransportError::AlreadyOpen);
        }

        let host = self.settings.host.clone();
        let candidates = match self.network.resolve(&host) {
            Ok(addrs) if !addrs.is_empty() => addrs,
            Ok(_) => {
                return Err(self.resolution_failed(
                    host,
                    io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
                ))
            }
            Err(e) => return Err(self.resolution_failed(host, e)),
        };

        debug!("Trying {} candidate address(es)", candidates.len());
        let result = self.connect_candidates(&candidates);
        drop(candidates);

        match result {
            Ok((socket, addr)) => {
                info!("Connected to SUPL server at {}", addr);
                self.socket = Some(socket);
                self.peer = Some(addr);
                Ok(addr)
            }
            Err(e) => {
                self.sink.error("Could not connect to SUPL server");
                Err(e)
            }
        }
    }

    fn resolution_failed(&self, host: String, source: io::Error) -> TransportError {
        self.sink.error(&format!(
            "Failed to resolve hostname {}, error: {}",
            host, source
        ));
        TransportError::Resolution { host, source }
    }

    fn connect_candidates(
        &mut self,
        candidates: &[SocketAddr],
    ) -> TransportResult<(N::Socket, SocketAddr)> {
        let port = self.settings.port;

        for candidate in candidates {
            let mut addr = *candidate;
            addr.set_port(port);

            let mut socket = self.network.socket(&addr).map_err(|e| {
                self.sink
                    .error(&format!("Failed to create socket, error: {}", e));
                TransportError::SocketCreation(e)
            })?;

            if let Err(e) = socket.set_read_timeout(self.settings.read_timeout) {
                self.sink
                    .error(&format!("Failed to set socket timeout, error: {}", e));
                let _ = socket.close();
                return Err(TransportError::SocketConfig(e));
            }

            self.sink
                .print(&format!("Connecting to {} port {}", addr.ip(), port));

            match socket.connect(addr, self.settings.connect_timeout) {
                Ok(()) => return Ok((socket, addr)),
                Err(e) => {
                    let _ = socket.close();
                    self.sink.error(&format!(
                        "Connecting to server failed, error: {}",
                        e
                    ));
                }
            }
        }

        Err(TransportError::AllCandidatesExhausted {
            host: self.settings.host.clone(),
            port,
            attempts: candidates.len(),
        })
    }

    /// Close the connection. Failures are reported, never returned.
    pub fn close(&mut self) {
        self.peer = None;
        let closed = match self.socket.take() {
            Some(socket) => socket.close(),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "no open SUPL socket",
            )),
        };

        match closed {
            Ok(()) => debug!("SUPL socket closed"),
            Err(e) => {
                warn!("Closing SUPL socket failed: {}", e);
                self.sink.error("Failed to close SUPL socket");
            }
        }
    }

    /// One send call; the returned count may be short
    pub fn write(&mut self, buf: &[u8]) -> TransportResult<usize> {
        let socket = self.socket.as_mut().ok_or(TransportError::NotConnected)?;
        Ok(socket.send(buf)?)
    }

    /// One receive call bounded by the read timeout
    pub fn read(&mut self, buf: &mut [u8]) -> TransportResult<ReadOutcome> {
        let socket = self.socket.as_mut().ok_or(TransportError::NotConnected)?;
        match socket.recv(buf) {
            Ok(n) => Ok(ReadOutcome::Data(n)),
            Err(e) if is_timeout(&e) => Ok(ReadOutcome::Timeout),
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}

impl<N: Network, S: DiagnosticSink> std::fmt::Debug for SuplConnection<N, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuplConnection")
            .field("settings", &self.settings)
            .field("open", &self.socket.is_some())
            .field("peer", &self.peer)
            .finish()
    }
}

/// `SO_RCVTIMEO` expiry shows up as `EAGAIN` on most stacks and as
/// `ETIMEDOUT` on some embedded ones
fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
