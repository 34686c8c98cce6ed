//! Configuration Manager

use super::Config;
use crate::Result;
use anyhow::{bail, Context};
use std::path::Path;
use std::time::Duration;

/// Manages configuration loading and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            config
                .validate()
                .with_context(|| "Configuration validation failed")?;

            tracing::info!("Configuration loaded and validated successfully");
            Ok(config)
        } else {
            tracing::warn!("Configuration file not found at {}, using defaults", path.display());
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Config> {
        let mut config = Config::default();

        if let Ok(host) = std::env::var("SUPL_SERVER_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("SUPL_SERVER_PORT") {
            config.server.port = port
                .parse::<u16>()
                .with_context(|| format!("Invalid SUPL_SERVER_PORT: {}", port))?;
        }

        if let Ok(timeout) = std::env::var("SUPL_READ_TIMEOUT") {
            config.server.read_timeout = humantime::parse_duration(&timeout)
                .with_context(|| format!("Invalid SUPL_READ_TIMEOUT: {}", timeout))?;
        }

        if let Ok(timeout) = std::env::var("SUPL_CONNECT_TIMEOUT") {
            config.server.connect_timeout = Some(
                humantime::parse_duration(&timeout)
                    .with_context(|| format!("Invalid SUPL_CONNECT_TIMEOUT: {}", timeout))?,
            );
        }

        if let Ok(log_level) = std::env::var("SUPL_LOG_LEVEL") {
            config.logging.level = log_level;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_server_config()
            .with_context(|| "Server configuration validation failed")?;

        self.validate_logging_config()
            .with_context(|| "Logging configuration validation failed")?;

        Ok(())
    }

    fn validate_server_config(&self) -> Result<()> {
        if self.server.host.is_empty() {
            bail!("server.host must not be empty");
        }

        if self.server.host.len() > 253 {
            bail!("server.host cannot exceed 253 characters");
        }

        if self.server.port == 0 {
            bail!("server.port must be greater than 0");
        }

        if self.server.read_timeout.is_zero() {
            bail!("read_timeout must be greater than 0");
        }

        if self.server.read_timeout > Duration::from_secs(60) {
            bail!("read_timeout cannot exceed 60 seconds");
        }

        if let Some(timeout) = self.server.connect_timeout {
            if timeout.is_zero() {
                bail!("connect_timeout must be greater than 0");
            }

            if timeout > Duration::from_secs(300) {
                bail!("connect_timeout cannot exceed 5 minutes");
            }
        }

        Ok(())
    }

    fn validate_logging_config(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            bail!("logging.level must be one of: {}", valid_log_levels.join(", "));
        }

        if self.logging.message_capacity < 16 {
            bail!("logging.message_capacity must be at least 16 bytes");
        }

        if self.logging.message_capacity > 4096 {
            bail!("logging.message_capacity cannot exceed 4096 bytes");
        }

        Ok(())
    }

    /// Merge with CLI arguments
    pub fn merge_with_cli_args(
        &mut self,
        host: Option<&str>,
        port: Option<u16>,
        read_timeout_ms: Option<u64>,
        log_level: Option<&str>,
    ) {
        if let Some(host) = host {
            self.server.host = host.to_string();
            tracing::info!("CLI override: server host set to {}", host);
        }

        if let Some(port) = port {
            self.server.port = port;
            tracing::info!("CLI override: port set to {}", port);
        }

        if let Some(ms) = read_timeout_ms {
            self.server.read_timeout = Duration::from_millis(ms);
            tracing::info!("CLI override: read timeout set to {}ms", ms);
        }

        if let Some(level) = log_level {
            self.logging.level = level.to_string();
            tracing::info!("CLI override: log level set to {}", level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.host, "supl.google.com");
        assert_eq!(config.server.port, 7276);
        assert_eq!(config.server.read_timeout, Duration::from_secs(1));
        assert_eq!(config.logging.message_capacity, 256);
    }

    #[test]
    fn test_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_timeouts() {
        let mut config = Config::default();
        config.server.read_timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.connect_timeout = Some(Duration::from_secs(600));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        config.merge_with_cli_args(Some("127.0.0.1"), Some(7275), Some(250), Some("debug"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7275);
        assert_eq!(config.server.read_timeout, Duration::from_millis(250));
        assert_eq!(config.logging.level, "debug");

        let settings = config.server.connection_settings();
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 7275);
    }
}
