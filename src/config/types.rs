//! Configuration Types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::connection::{
    ConnectionSettings, DEFAULT_READ_TIMEOUT, DEFAULT_SUPL_PORT, DEFAULT_SUPL_SERVER,
};
use crate::engine::DEFAULT_MESSAGE_CAPACITY;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// SUPL server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<Duration>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Engine log buffer size in bytes, terminator slot included
    pub message_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SUPL_SERVER.to_string(),
            port: DEFAULT_SUPL_PORT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            connect_timeout: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            message_capacity: DEFAULT_MESSAGE_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Settings for a new connection context
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.host.clone(),
            port: self.port,
            read_timeout: self.read_timeout,
            connect_timeout: self.connect_timeout,
        }
    }
}
