//! wifiqr - Wi-Fi QR codes, connect scripts and configuration profiles
//!
//! ## Quick Start
//!
//! ```bash
//! # Print the QR payload for a network
//! wifiqr payload --ssid HomeNet --password secret
//!
//! # Keep a list of networks
//! wifiqr network add --ssid Guest --password welcome --location Lobby
//! wifiqr network list
//!
//! # Export QR codes, a Windows connect script or an Apple profile
//! wifiqr export --format png --all --output-dir out/
//! wifiqr export --format script --select 1,3
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
