//! Configuration management for wifiqr

use crate::error::{Result, WifiQrError};
use crate::export::ExportFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// QR rendering settings
    pub qr: QrConfig,
    /// Export settings
    pub export: ExportConfig,
    /// Save file settings
    pub storage: StorageConfig,
}

/// QR rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Edge length of the rendered QR image in pixels
    pub size: u32,
    /// Quiet zone in modules
    pub border: u32,
    /// Module color as `#rrggbb`
    pub fill_color: String,
    /// Background color as `#rrggbb`
    pub background_color: String,
    /// Edge length of the center image in pixels
    pub center_image_size: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            size: 640,
            border: 2,
            fill_color: "#111827".to_string(),
            background_color: "#ffffff".to_string(),
            center_image_size: 100,
        }
    }
}

/// Export-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default export format (png, pdf, script, profile)
    pub default_format: String,
    /// Print the location above the QR code
    pub include_header: bool,
    /// Directory exports are written to
    pub output_dir: PathBuf,
    /// TrueType font used for PNG headers
    pub header_font: Option<PathBuf>,
    /// Header font size in pixels
    pub header_font_size: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: "png".to_string(),
            include_header: true,
            output_dir: PathBuf::from("."),
            header_font: None,
            header_font_size: 48.0,
        }
    }
}

/// Save file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Default network collection file
    pub collection_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            collection_path: PathBuf::from("wifi-networks.json"),
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "wifiqr", "wifiqr")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".wifiqr")
                    .join("config.toml")
            })
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| WifiQrError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config file, creating its directory
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| WifiQrError::Toml(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges and formats
    pub fn validate(&self) -> Result<()> {
        if !(64..=8192).contains(&self.qr.size) {
            return Err(WifiQrError::Config(format!(
                "qr.size must be between 64 and 8192, got {}",
                self.qr.size
            )));
        }
        if self.qr.border > 32 {
            return Err(WifiQrError::Config(format!(
                "qr.border must be at most 32, got {}",
                self.qr.border
            )));
        }
        if self.qr.center_image_size >= self.qr.size {
            return Err(WifiQrError::Config(
                "qr.center_image_size must be smaller than qr.size".to_string(),
            ));
        }
        parse_hex_color(&self.qr.fill_color)?;
        parse_hex_color(&self.qr.background_color)?;
        self.export
            .default_format
            .parse::<ExportFormat>()
            .map_err(|_| {
                WifiQrError::Config(format!(
                    "export.default_format '{}' is not one of png, pdf, script, profile",
                    self.export.default_format
                ))
            })?;
        if !(self.export.header_font_size.is_finite() && self.export.header_font_size > 0.0) {
            return Err(WifiQrError::Config(
                "export.header_font_size must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse `#rrggbb` into RGB components
pub fn parse_hex_color(value: &str) -> Result<[u8; 3]> {
    let hex = value
        .strip_prefix('#')
        .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| WifiQrError::Config(format!("Invalid color '{}', expected #rrggbb", value)))?;
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| WifiQrError::Config(format!("Invalid color '{}'", value)))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}
