//! Command line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use traffic_core::SourceConfig;

use crate::runner::RunnerConfig;
use crate::transport::ReplayOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// FLARM data port reachable over TCP
    Network,
    /// Recorded data stream
    File,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "traffic-receiver")]
#[command(about = "Receive FLARM traffic from a device or a recording", long_about = None)]
pub struct Args {
    /// Where the data comes from
    #[arg(long, value_enum, default_value = "network")]
    pub source: SourceKind,

    /// Device address as host:port
    #[arg(long, default_value = "192.168.1.1:2000")]
    pub address: String,

    /// Recording to replay (required with --source file)
    #[arg(long, required_if_eq("source", "file"))]
    pub file: Option<PathBuf>,

    /// Replay speed factor
    #[arg(long, default_value = "1.0")]
    pub speed: f64,

    /// Delay between replayed lines without timestamps
    #[arg(long, default_value = "100")]
    pub line_interval_ms: u64,

    /// Loop the recording
    #[arg(long)]
    pub repeat: bool,

    /// TCP connect timeout
    #[arg(long, default_value = "5")]
    pub connect_timeout_secs: u64,

    /// Silence after which a TCP connection is considered lost
    #[arg(long, default_value = "5")]
    pub read_timeout_secs: u64,

    /// Delay before reconnecting after a failure (0 disables reconnecting)
    #[arg(long, default_value = "5")]
    pub reconnect_secs: u64,

    /// Remove traffic not updated for this long
    #[arg(long, default_value = "10")]
    pub factor_expiry_secs: u64,

    /// Maximum number of tracked targets
    #[arg(long, default_value = "64")]
    pub max_targets: usize,

    /// Interval of the decode statistics log (0 disables it)
    #[arg(long, default_value = "60")]
    pub stats_interval_secs: u64,
}

/// Invalid combination of command line options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("--file is required with --source file")]
    MissingFile,
    #[error("--address must not be empty")]
    EmptyAddress,
    #[error("--speed must be a positive number, got {0}")]
    InvalidSpeed(f64),
    #[error("--{0} must be greater than zero")]
    Zero(&'static str),
}

/// Transport selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSettings {
    Network {
        address: String,
        connect_timeout: Duration,
        read_timeout: Duration,
    },
    File {
        path: PathBuf,
        options: ReplayOptions,
    },
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: SourceSettings,
    pub core: SourceConfig,
    pub runner: RunnerConfig,
}

impl TryFrom<Args> for Settings {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let source = match args.source {
            SourceKind::Network => {
                if args.address.trim().is_empty() {
                    return Err(ConfigError::EmptyAddress);
                }
                SourceSettings::Network {
                    address: args.address,
                    connect_timeout: non_zero_secs(args.connect_timeout_secs, "connect-timeout-secs")?,
                    read_timeout: non_zero_secs(args.read_timeout_secs, "read-timeout-secs")?,
                }
            }
            SourceKind::File => {
                let path = args.file.ok_or(ConfigError::MissingFile)?;
                if !(args.speed.is_finite() && args.speed > 0.0) {
                    return Err(ConfigError::InvalidSpeed(args.speed));
                }
                SourceSettings::File {
                    path,
                    options: ReplayOptions {
                        line_interval: Duration::from_millis(args.line_interval_ms),
                        speed: args.speed,
                        repeat: args.repeat,
                    },
                }
            }
        };

        if args.max_targets == 0 {
            return Err(ConfigError::Zero("max-targets"));
        }
        let core = SourceConfig::default()
            .with_factor_expiry(non_zero_secs(args.factor_expiry_secs, "factor-expiry-secs")?)
            .with_max_targets(args.max_targets);

        let runner = RunnerConfig {
            reconnect_interval: optional_secs(args.reconnect_secs),
            stats_interval: optional_secs(args.stats_interval_secs),
            ..RunnerConfig::default()
        };

        Ok(Self {
            source,
            core,
            runner,
        })
    }
}

fn non_zero_secs(secs: u64, name: &'static str) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Zero(name));
    }
    Ok(Duration::from_secs(secs))
}

fn optional_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
