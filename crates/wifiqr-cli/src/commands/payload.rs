//! Payload command
//!
//! Print the QR payload for a network, or decode one.

use anyhow::Result;
use clap::Args;
use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};

use super::RecordArgs;
use wifiqr_core::payload;

/// Arguments for the payload command
#[derive(Debug, Args)]
pub struct PayloadArgs {
    #[command(flatten)]
    pub record: RecordArgs,

    /// Decode this payload instead of building one
    #[arg(long, conflicts_with = "ssid")]
    pub decode: Option<String>,

    /// Also draw the QR code in the terminal
    #[arg(long, conflicts_with = "decode")]
    pub qr: bool,

    /// Output decoded fields as JSON
    #[arg(long, requires = "decode")]
    pub json: bool,
}

/// Execute the payload command
pub fn execute(args: PayloadArgs) -> Result<()> {
    match &args.decode {
        Some(text) => decode(text, args.json),
        None => encode(&args),
    }
}

fn encode(args: &PayloadArgs) -> Result<()> {
    let record = args.record.to_record()?;
    let text = payload::encode(&record)?;
    println!("{}", text);

    if args.qr {
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)?;
        let drawing = code
            .render::<unicode::Dense1x2>()
            .quiet_zone(true)
            .build();
        println!();
        println!("{}", drawing);
    }
    Ok(())
}

fn decode(text: &str, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let decoded = payload::decode(text.trim())?;

    if as_json {
        let json = serde_json::json!({
            "ssid": decoded.ssid,
            "security": decoded.security.label(),
            "password": decoded.password,
            "hidden": decoded.hidden,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("  SSID:     {}", decoded.ssid.green());
    println!("  Security: {}", decoded.security.label().cyan());
    match &decoded.password {
        Some(password) => println!("  Password: {}", password),
        None => println!("  Password: {}", "(none)".dimmed()),
    }
    println!("  Hidden:   {}", if decoded.hidden { "yes" } else { "no" });
    Ok(())
}
