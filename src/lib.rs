//! SUPL Transport Library
//!
//! Blocking TCP transport that plugs a SUPL (Secure User Plane Location)
//! session engine into a SUPL server: hostname resolution with dual-stack
//! fallback, per-candidate connect, a bounded receive timeout, and the
//! write/read/log callbacks the engine drives.

pub mod config;
pub mod connection;
pub mod diagnostics;
pub mod engine;

pub use config::Config;
pub use connection::{ConnectionSettings, ReadOutcome, SuplConnection, TransportError};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use engine::SuplCallbacks;

/// Common error type for configuration and the CLI
pub type Result<T> = anyhow::Result<T>;
