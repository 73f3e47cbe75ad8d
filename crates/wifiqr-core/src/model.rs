//! Network records and the ordered collection they live in

use crate::error::{Result, WifiQrError};
use crate::security::SecurityMode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Image shown in the middle of a QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    /// Declared format tag, e.g. `png`
    pub format: String,
    /// Raw encoded image bytes
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(format: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            format: format.into(),
            bytes,
        }
    }

    /// Build a blob from raw bytes, detecting the format from its magic number
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let format = Self::sniff_format(&bytes);
        Self::new(format, bytes)
    }

    /// Decode a base64 blob
    pub fn from_base64(format: impl Into<String>, data: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| WifiQrError::Format(format!("Center image is not valid base64: {}", e)))?;
        Ok(Self::new(format, bytes))
    }

    /// Base64 text of the image bytes
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Best-effort format tag for well-known image headers
    pub fn sniff_format(bytes: &[u8]) -> &'static str {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            "png"
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            "jpeg"
        } else if bytes.starts_with(b"GIF8") {
            "gif"
        } else if bytes.starts_with(b"BM") {
            "bmp"
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            "webp"
        } else {
            "bin"
        }
    }
}

/// A single Wi-Fi network
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkRecord {
    /// Free-text label used for headers and file listings only
    pub location: String,
    pub ssid: String,
    pub password: String,
    pub security: SecurityMode,
    pub hidden: bool,
    pub center_image: Option<ImageBlob>,
}

impl NetworkRecord {
    /// Create a record with the given SSID, password and mode
    pub fn new(ssid: impl Into<String>, password: impl Into<String>, security: SecurityMode) -> Self {
        Self {
            location: String::new(),
            ssid: ssid.into(),
            password: password.into(),
            security,
            hidden: false,
            center_image: None,
        }
    }

    /// Create an open network
    pub fn open(ssid: impl Into<String>) -> Self {
        Self::new(ssid, "", SecurityMode::Open)
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_center_image(mut self, image: ImageBlob) -> Self {
        self.center_image = Some(image);
        self
    }

    /// Every precondition this record violates, empty when it can be encoded
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.ssid.trim().is_empty() {
            problems.push("SSID is required".to_string());
        }
        if self.security.requires_password() && self.password.is_empty() {
            problems.push(format!(
                "password is required for {} networks",
                self.security.label()
            ));
        }
        for (field, value) in [
            ("SSID", &self.ssid),
            ("password", &self.password),
            ("location", &self.location),
        ] {
            if let Some(c) = value.chars().find(|c| c.is_control()) {
                problems.push(format!(
                    "{} contains control character U+{:04X}",
                    field, c as u32
                ));
            }
        }
        problems
    }

    /// Fail with a validation error if the record cannot be encoded
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(WifiQrError::Validation(problems.join(", ")))
        }
    }
}

/// Ordered set of records; position is the only identity a record has
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordCollection {
    records: Vec<NetworkRecord>,
}

impl RecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<NetworkRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: NetworkRecord) {
        self.records.push(record);
    }

    /// Insert a record at a position, shifting later records down
    pub fn insert(&mut self, index: usize, record: NetworkRecord) -> Result<()> {
        if index > self.records.len() {
            return Err(self.out_of_range(index));
        }
        self.records.insert(index, record);
        Ok(())
    }

    /// Replace the record at a position
    pub fn update(&mut self, index: usize, record: NetworkRecord) -> Result<()> {
        let slot = self
            .records
            .get_mut(index)
            .ok_or_else(|| WifiQrError::Validation(format!("No network at position {}", index + 1)))?;
        *slot = record;
        Ok(())
    }

    /// Remove and return the record at a position
    pub fn remove(&mut self, index: usize) -> Result<NetworkRecord> {
        if index >= self.records.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.records.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&NetworkRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NetworkRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[NetworkRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<NetworkRecord> {
        self.records
    }

    /// Records at the given positions, in the order the positions are given
    pub fn select(&self, indices: &[usize]) -> Result<Vec<&NetworkRecord>> {
        indices
            .iter()
            .map(|&i| self.records.get(i).ok_or_else(|| self.out_of_range(i)))
            .collect()
    }

    /// Positions of records whose location or SSID contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return (0..self.records.len()).collect();
        }
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                r.location.to_lowercase().contains(&needle) || r.ssid.to_lowercase().contains(&needle)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Position of the first record with exactly this SSID
    pub fn find_ssid(&self, ssid: &str) -> Option<usize> {
        self.records.iter().position(|r| r.ssid == ssid)
    }

    fn out_of_range(&self, index: usize) -> WifiQrError {
        WifiQrError::Validation(format!(
            "Position {} is out of range (collection has {} network(s))",
            index + 1,
            self.records.len()
        ))
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a NetworkRecord;
    type IntoIter = std::slice::Iter<'a, NetworkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<NetworkRecord> for RecordCollection {
    fn from_iter<I: IntoIterator<Item = NetworkRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> RecordCollection {
        RecordCollection::from_records(vec![
            NetworkRecord::new("HomeNet", "secret", SecurityMode::Wpa).with_location("Home"),
            NetworkRecord::open("CafeGuest").with_location("Corner Cafe"),
            NetworkRecord::new("Office", "k3y", SecurityMode::Wep).with_location("HQ"),
        ])
    }

    #[test]
    fn test_validate_ok() {
        assert!(NetworkRecord::new("Net", "pw", SecurityMode::Wpa).validate().is_ok());
        assert!(NetworkRecord::open("Cafe").validate().is_ok());
    }

    #[test]
    fn test_validate_blank_ssid() {
        let err = NetworkRecord::open("   ").validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("SSID is required"));
    }

    #[test]
    fn test_validate_missing_password() {
        let record = NetworkRecord::new("", "", SecurityMode::Wep);
        assert_eq!(record.problems().len(), 2);
    }

    #[test]
    fn test_open_network_ignores_password() {
        let record = NetworkRecord::new("Cafe", "", SecurityMode::Open);
        assert!(record.problems().is_empty());
    }

    #[test]
    fn test_control_characters_rejected() {
        let record = NetworkRecord::new("Net\u{1}x", "pw\nshutdown /s", SecurityMode::Wpa)
            .with_location("Lobby\r\ndel /q C:\\temp\\*");
        assert_eq!(
            record.problems(),
            vec![
                "SSID contains control character U+0001",
                "password contains control character U+000A",
                "location contains control character U+000D",
            ]
        );
        assert!(NetworkRecord::open("Net\0").validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_non_ascii_text_is_fine() {
        let record = NetworkRecord::new("Café 東京", "pässwörd", SecurityMode::Wpa)
            .with_location("Étage 2");
        assert!(record.problems().is_empty());
    }

    #[test]
    fn test_collection_order_and_mutation() {
        let mut collection = sample();
        assert_eq!(collection.len(), 3);

        let removed = collection.remove(1).unwrap();
        assert_eq!(removed.ssid, "CafeGuest");
        assert_eq!(collection.get(1).unwrap().ssid, "Office");

        collection.insert(0, NetworkRecord::open("First")).unwrap();
        assert_eq!(collection.get(0).unwrap().ssid, "First");

        collection
            .update(2, NetworkRecord::open("Renamed"))
            .unwrap();
        assert_eq!(collection.get(2).unwrap().ssid, "Renamed");

        assert!(collection.remove(10).is_err());
        assert!(collection.update(10, NetworkRecord::open("x")).is_err());
    }

    #[test]
    fn test_select_preserves_requested_order() {
        let collection = sample();
        let picked = collection.select(&[2, 0]).unwrap();
        let ssids: Vec<_> = picked.iter().map(|r| r.ssid.as_str()).collect();
        assert_eq!(ssids, vec!["Office", "HomeNet"]);
        assert!(collection.select(&[3]).is_err());
    }

    #[test]
    fn test_search() {
        let collection = sample();
        assert_eq!(collection.search("cafe"), vec![1]);
        assert_eq!(collection.search("hq"), vec![2]);
        assert_eq!(collection.search(""), vec![0, 1, 2]);
        assert!(collection.search("nothing").is_empty());
        assert_eq!(collection.find_ssid("Office"), Some(2));
    }

    #[test]
    fn test_image_blob_base64() {
        let blob = ImageBlob::from_bytes(vec![0x89, b'P', b'N', b'G', 1, 2, 3]);
        assert_eq!(blob.format, "png");
        let text = blob.to_base64();
        let back = ImageBlob::from_base64("png", &text).unwrap();
        assert_eq!(back, blob);
        assert!(ImageBlob::from_base64("png", "not base64!!").is_err());
    }

    #[test]
    fn test_sniff_format() {
        assert_eq!(ImageBlob::sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0]), "jpeg");
        assert_eq!(ImageBlob::sniff_format(b"GIF89a"), "gif");
        assert_eq!(ImageBlob::sniff_format(b"RIFF\0\0\0\0WEBPVP8 "), "webp");
        assert_eq!(ImageBlob::sniff_format(b"??"), "bin");
    }
}
