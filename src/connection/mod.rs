//! Connection Management Module
//!
//! Resolves the SUPL server, establishes the single outbound TCP
//! connection and exposes its lifecycle.

pub mod error;
pub mod manager;
pub mod network;

pub use error::{TransportError, TransportResult};
pub use manager::{ConnectionSettings, ReadOutcome, SuplConnection};
pub use network::{Network, SuplSocket, SystemNetwork, SystemSocket};

use std::time::Duration;

/// Default SUPL server hostname
pub const DEFAULT_SUPL_SERVER: &str = "supl.google.com";

/// Default SUPL server port
pub const DEFAULT_SUPL_PORT: u16 = 7276;

/// Receive timeout the SUPL engine's read loop is built around
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
