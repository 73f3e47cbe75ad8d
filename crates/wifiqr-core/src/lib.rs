//! wifiqr-core - Core library for wifiqr
//!
//! This crate turns Wi-Fi network records into three equivalent outputs: the
//! QR payload string, a Windows connect script and an Apple configuration
//! profile. It also owns the save file format and export orchestration.

pub mod error;
pub mod model;
pub mod security;
pub mod escape;
pub mod payload;
pub mod wlan;
pub mod script;
pub mod profile;
pub mod codec;
pub mod config;
pub mod export;

pub use error::{ErrorKind, RecordIssue, Result, WifiQrError};
pub use model::{ImageBlob, NetworkRecord, RecordCollection};
pub use security::{SecurityMode, Target};
