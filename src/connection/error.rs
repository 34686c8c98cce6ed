//! Transport Errors

use std::io;
use thiserror::Error;

/// Failures surfaced by [`SuplConnection`](super::SuplConnection)
///
/// Per-candidate connect failures and close failures are reported to the
/// diagnostic sink only and never appear here.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Hostname resolution failed or produced no addresses
    #[error("failed to resolve hostname {host}: {source}")]
    Resolution {
        host: String,
        #[source]
        source: io::Error,
    },

    /// A TCP socket could not be created
    #[error("failed to create socket: {0}")]
    SocketCreation(#[source] io::Error),

    /// The receive timeout could not be applied to a fresh socket
    #[error("failed to set socket timeout: {0}")]
    SocketConfig(#[source] io::Error),

    /// Every resolved candidate refused or failed the connect
    #[error("could not connect to SUPL server {host}:{port} after {attempts} attempt(s)")]
    AllCandidatesExhausted {
        host: String,
        port: u16,
        attempts: usize,
    },

    /// `open` was called while a connection is still live
    #[error("SUPL connection already open")]
    AlreadyOpen,

    /// Read or write without a live connection
    #[error("SUPL connection is not open")]
    NotConnected,

    /// Send or receive failure on the live connection
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;
