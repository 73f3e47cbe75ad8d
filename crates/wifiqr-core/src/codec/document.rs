//! Save file layout and schema versioning

use crate::error::{Result, WifiQrError};
use crate::model::{ImageBlob, NetworkRecord};
use crate::security::{normalize, SecurityMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// Schema version as `major.minor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

impl SchemaVersion {
    pub const V1_0: Self = Self { major: 1, minor: 0 };

    /// Parse `major.minor`
    pub fn parse(s: &str) -> Option<Self> {
        let (major, minor) = s.split_once('.')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }

    /// Same major version means the document can be read
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.major == other.major
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The save file: a mapping with a version tag and the ordered network list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFile {
    pub schema_version: String,
    pub networks: Vec<RecordEntry>,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl CollectionFile {
    pub fn new(networks: Vec<RecordEntry>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            networks,
            extra: HashMap::new(),
        }
    }

    /// Reject documents written by an incompatible major version
    pub fn check_version(&self) -> Result<SchemaVersion> {
        let version = SchemaVersion::parse(&self.schema_version).ok_or_else(|| {
            WifiQrError::Format(format!("Invalid schema version: {}", self.schema_version))
        })?;
        if !version.is_compatible(&SchemaVersion::V1_0) {
            return Err(WifiQrError::Format(format!(
                "Incompatible schema version: {} (expected {}.x)",
                self.schema_version,
                SchemaVersion::V1_0.major
            )));
        }
        Ok(version)
    }
}

/// One network as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
    #[serde(default)]
    pub location: String,
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    /// User-facing label, normalized on load
    pub security: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub center_image: Option<ImageEntry>,
}

/// Center image as a format tag plus base64 text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEntry {
    pub format: String,
    pub data: String,
}

impl RecordEntry {
    pub fn from_record(record: &NetworkRecord) -> Self {
        Self {
            location: record.location.clone(),
            ssid: record.ssid.clone(),
            password: record.password.clone(),
            security: record.security.label().to_string(),
            hidden: record.hidden,
            center_image: record.center_image.as_ref().map(|image| ImageEntry {
                format: image.format.clone(),
                data: image.to_base64(),
            }),
        }
    }

    pub fn into_record(self) -> Result<NetworkRecord> {
        let center_image = self
            .center_image
            .map(|image| ImageBlob::from_base64(image.format, &image.data))
            .transpose()?;
        Ok(NetworkRecord {
            location: self.location,
            ssid: self.ssid,
            password: self.password,
            security: normalize(&self.security),
            hidden: self.hidden,
            center_image,
        })
    }
}

/// Entry of the first-release bare-list save file
///
/// The image was stored as base64 under `image_data` without a format tag.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyEntry {
    #[serde(default)]
    pub location: String,
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_security_label")]
    pub security: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub image_data: Option<String>,
}

fn default_security_label() -> String {
    SecurityMode::default().label().to_string()
}

impl LegacyEntry {
    pub fn into_record(self) -> Result<NetworkRecord> {
        let center_image = match self.image_data.as_deref().map(str::trim) {
            Some(data) if !data.is_empty() => {
                let blob = ImageBlob::from_base64("", data)?;
                Some(ImageBlob::from_bytes(blob.bytes))
            }
            _ => None,
        };
        Ok(NetworkRecord {
            location: self.location,
            ssid: self.ssid,
            password: self.password,
            security: normalize(&self.security),
            hidden: self.hidden,
            center_image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version_parse() {
        let version = SchemaVersion::parse("1.3").unwrap();
        assert_eq!(version, SchemaVersion { major: 1, minor: 3 });
        assert!(version.is_compatible(&SchemaVersion::V1_0));
        assert!(SchemaVersion::parse("one").is_none());
        assert_eq!(SchemaVersion::V1_0.to_string(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_incompatible_version() {
        let mut file = CollectionFile::new(Vec::new());
        assert!(file.check_version().is_ok());
        file.schema_version = "2.0".to_string();
        assert!(file.check_version().is_err());
        file.schema_version = "garbage".to_string();
        assert!(file.check_version().is_err());
    }

    #[test]
    fn test_forward_compatible_fields_are_kept() {
        let json = r#"{"schema_version": "1.1", "networks": [], "future_field": 1}"#;
        let file: CollectionFile = serde_json::from_str(json).unwrap();
        assert!(file.extra.contains_key("future_field"));
        assert!(file.check_version().is_ok());
    }

    #[test]
    fn test_legacy_entry_defaults() {
        let entry: LegacyEntry = serde_json::from_str(r#"{"ssid": "Net"}"#).unwrap();
        let record = entry.into_record().unwrap();
        assert_eq!(record.security, SecurityMode::Wpa);
        assert!(record.center_image.is_none());
    }
}
