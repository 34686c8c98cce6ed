//! supl-probe - SUPL server connectivity probe
//!
//! Opens the SUPL transport the same way a SUPL session engine would,
//! optionally pushes a raw payload through the write callback, polls the
//! read callback and closes the connection.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use supl_transport::{config::ConfigManager, SuplCallbacks, SuplConnection};

/// CLI arguments for supl-probe
#[derive(Parser, Debug)]
#[command(name = "supl-probe")]
#[command(about = "Probe a SUPL server over the blocking TCP transport")]
#[command(version)]
#[command(long_about = "
supl-probe - SUPL server connectivity probe

Configuration priority (highest to lowest):
1. Command-line arguments
2. Configuration file
3. Environment variables
4. Built-in defaults (supl.google.com:7276, 1s read timeout)

Environment variables:
  SUPL_SERVER_HOST      - SUPL server hostname
  SUPL_SERVER_PORT      - SUPL server port
  SUPL_READ_TIMEOUT     - Receive timeout (e.g., 1s, 500ms)
  SUPL_CONNECT_TIMEOUT  - Connect timeout (e.g., 10s)
  SUPL_LOG_LEVEL        - Log level (trace, debug, info, warn, error)
")]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "supl.toml", help = "Path to configuration file")]
    pub config: PathBuf,

    /// SUPL server hostname (overrides config file)
    #[arg(long, help = "SUPL server hostname")]
    pub host: Option<String>,

    /// SUPL server port (overrides config file)
    #[arg(short, long, help = "SUPL server port")]
    pub port: Option<u16>,

    /// Receive timeout in milliseconds
    #[arg(long, help = "Receive timeout in milliseconds")]
    pub read_timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, help = "Log level")]
    pub log_level: Option<String>,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Hex encoded payload to send after connecting
    #[arg(long, help = "Hex encoded payload to send after connecting")]
    pub send_hex: Option<String>,

    /// Number of read polls before closing
    #[arg(long, default_value_t = 3, help = "Number of read polls before closing")]
    pub polls: u32,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration and exit")]
    pub validate_config: bool,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = if args.config.exists() {
        ConfigManager::load_from_file(&args.config)?
    } else {
        ConfigManager::load_from_env()?
    };

    config.merge_with_cli_args(
        args.host.as_deref(),
        args.port,
        args.read_timeout_ms,
        args.log_level.as_deref(),
    );

    config
        .validate()
        .context("Final configuration validation failed")?;

    init_tracing(&args, &config.logging.level)?;

    info!("Starting supl-probe v{}", env!("CARGO_PKG_VERSION"));

    if args.validate_config {
        info!("Configuration is valid");
        info!("  SUPL server: {}:{}", config.server.host, config.server.port);
        info!("  Read timeout: {:?}", config.server.read_timeout);
        match config.server.connect_timeout {
            Some(timeout) => info!("  Connect timeout: {:?}", timeout),
            None => info!("  Connect timeout: blocking"),
        }
        info!("  Log message capacity: {} bytes", config.logging.message_capacity);
        return Ok(());
    }

    let payload = match &args.send_hex {
        Some(hex) => Some(parse_hex(hex).context("Invalid --send-hex payload")?),
        None => None,
    };

    let mut connection = SuplConnection::system(config.server.connection_settings())
        .with_message_capacity(config.logging.message_capacity);

    let peer = connection
        .open()
        .with_context(|| format!("Failed to open SUPL connection to {}", config.server.host))?;
    info!("SUPL transport ready, peer {}", peer);

    let result = run_probe(&mut connection, payload.as_deref(), args.polls);
    connection.close();
    result
}

fn run_probe<C: SuplCallbacks>(callbacks: &mut C, payload: Option<&[u8]>, polls: u32) -> Result<()> {
    if let Some(payload) = payload {
        let sent = callbacks.write(payload);
        if sent < 0 {
            bail!("Sending {} byte payload failed", payload.len());
        }
        callbacks.log(0, format_args!("Sent {} of {} bytes", sent, payload.len()));
    }

    let mut buf = [0u8; 2048];
    for poll in 1..=polls {
        match callbacks.read(&mut buf) {
            n if n < 0 => {
                error!("Read poll {} failed", poll);
                bail!("SUPL read failed");
            }
            0 => {
                callbacks.log(0, format_args!("Poll {}: no data within timeout", poll));
            }
            n => {
                let n = n as usize;
                callbacks.log(0, format_args!("Poll {}: received {} bytes: {}", poll, n, to_hex(&buf[..n])));
            }
        }
    }

    Ok(())
}

fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits");
    }

    digits
        .chunks(2)
        .map(|pair| {
            let byte: String = pair.iter().collect();
            u8::from_str_radix(&byte, 16).with_context(|| format!("invalid hex byte '{}'", byte))
        })
        .collect()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Initialize tracing/logging
fn init_tracing(args: &CliArgs, level: &str) -> Result<()> {
    let log_level = if args.verbose { "debug" } else { level };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_ansi(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}
