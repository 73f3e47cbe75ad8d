//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod config;
pub mod export;
pub mod network;
pub mod payload;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use wifiqr_core::config::Config;
use wifiqr_core::security::normalize_label;
use wifiqr_core::{ImageBlob, NetworkRecord, SecurityMode};

/// wifiqr - Wi-Fi QR codes, connect scripts and configuration profiles
#[derive(Debug, Parser)]
#[command(name = "wifiqr")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build or decode a Wi-Fi QR payload
    Payload(payload::PayloadArgs),

    /// Manage the saved network list
    Network(network::NetworkArgs),

    /// Export QR images, connect scripts or profiles
    Export(export::ExportArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    let load_config = || {
        Config::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    };

    match cli.command {
        Commands::Payload(args) => payload::execute(args),
        Commands::Network(args) => network::execute(args, &load_config()?),
        Commands::Export(args) => export::execute(args, &load_config()?),
        Commands::Config(cmd) => config::execute(cmd, &config_path),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Network fields shared by `payload`, `network add` and inline exports
#[derive(Debug, Clone, Args)]
pub struct RecordArgs {
    /// Network name
    #[arg(long)]
    pub ssid: Option<String>,

    /// Network password (not used for open networks)
    #[arg(long, short = 'p', default_value = "")]
    pub password: String,

    /// Security type: WPA/WPA2/WPA3, WEP or None
    #[arg(long, short = 's', default_value = "WPA/WPA2/WPA3")]
    pub security: String,

    /// The network does not broadcast its SSID
    #[arg(long)]
    pub hidden: bool,

    /// Location printed above exported QR codes
    #[arg(long, short = 'l', default_value = "")]
    pub location: String,

    /// Image placed in the middle of the QR code
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl RecordArgs {
    /// Build a record, failing on a missing SSID or an unknown security type
    pub fn to_record(&self) -> Result<NetworkRecord> {
        let ssid = self
            .ssid
            .clone()
            .ok_or_else(|| anyhow!("--ssid is required"))?;
        let mut record = NetworkRecord::new(ssid, self.password.clone(), parse_security(&self.security)?)
            .with_location(self.location.clone())
            .with_hidden(self.hidden);
        if let Some(path) = &self.image {
            record = record.with_center_image(read_image(path)?);
        }
        Ok(record)
    }
}

/// Parse a security label, rejecting labels the vocabulary does not know
pub fn parse_security(label: &str) -> Result<SecurityMode> {
    let normalized = normalize_label(label);
    if !normalized.recognized {
        bail!(
            "Unknown security type '{}' (expected one of: {})",
            label,
            SecurityMode::OPTIONS.join(", ")
        );
    }
    Ok(normalized.mode)
}

pub fn read_image(path: &std::path::Path) -> Result<ImageBlob> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok(ImageBlob::from_bytes(bytes))
}

/// Turn a 1-based position from the command line into an index
pub fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Network positions start at 1"))
}
