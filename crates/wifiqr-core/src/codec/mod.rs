//! Serialization of record collections
//!
//! The save file is pretty-printed UTF-8 JSON:
//!
//! ```json
//! {
//!   "schema_version": "1.0",
//!   "networks": [
//!     {
//!       "location": "Lobby",
//!       "ssid": "Guest",
//!       "password": "welcome",
//!       "security": "WPA/WPA2/WPA3",
//!       "hidden": false,
//!       "center_image": { "format": "png", "data": "iVBORw0KGgo..." }
//!     }
//!   ]
//! }
//! ```
//!
//! Files written by the first releases (a bare list with `image_data`) are
//! still accepted by [`deserialize`].

mod document;

pub use document::{
    CollectionFile, ImageEntry, LegacyEntry, RecordEntry, SchemaVersion, CURRENT_SCHEMA_VERSION,
};

use crate::error::{Result, WifiQrError};
use crate::model::RecordCollection;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Encode a collection as a save document
pub fn serialize(collection: &RecordCollection) -> Result<Vec<u8>> {
    let file = CollectionFile::new(collection.iter().map(RecordEntry::from_record).collect());
    let mut bytes = serde_json::to_vec_pretty(&file)
        .map_err(|e| WifiQrError::Encoding(format!("Failed to serialize networks: {}", e)))?;
    bytes.push(b'\n');
    debug!(networks = collection.len(), bytes = bytes.len(), "Serialized collection");
    Ok(bytes)
}

/// Decode a save document into a new collection
pub fn deserialize(bytes: &[u8]) -> Result<RecordCollection> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| WifiQrError::Format(format!("Save file is not valid JSON: {}", e)))?;

    let records = match value {
        serde_json::Value::Object(_) => {
            let file: CollectionFile = from_value(value, "save file")?;
            file.check_version()?;
            file.networks
                .into_iter()
                .enumerate()
                .map(|(i, entry)| entry.into_record().map_err(|e| at_entry(i, e)))
                .collect::<Result<Vec<_>>>()?
        }
        serde_json::Value::Array(entries) => {
            info!("Reading legacy network list");
            entries
                .into_iter()
                .enumerate()
                .map(|(i, entry)| {
                    from_value::<LegacyEntry>(entry, &format!("network #{}", i + 1))?
                        .into_record()
                        .map_err(|e| at_entry(i, e))
                })
                .collect::<Result<Vec<_>>>()?
        }
        other => {
            return Err(WifiQrError::Format(format!(
                "Save file must be a mapping or a list, found {}",
                json_type(&other)
            )))
        }
    };

    debug!(networks = records.len(), "Deserialized collection");
    Ok(RecordCollection::from_records(records))
}

/// Replace `collection` with the decoded document, leaving it untouched on error
pub fn load_into(collection: &mut RecordCollection, bytes: &[u8]) -> Result<()> {
    *collection = deserialize(bytes)?;
    Ok(())
}

fn from_value<T: DeserializeOwned>(value: serde_json::Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| WifiQrError::Format(format!("Invalid {}: {}", what, e)))
}

fn at_entry(index: usize, err: WifiQrError) -> WifiQrError {
    match err {
        WifiQrError::Format(msg) => WifiQrError::Format(format!("network #{}: {}", index + 1, msg)),
        other => other,
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "a mapping",
    }
}
