//! File system storage for network collections

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use wifiqr_core::codec;
use wifiqr_core::error::{Result, WifiQrError};
use wifiqr_core::RecordCollection;

/// A network collection saved as one JSON file
pub struct CollectionStore {
    path: PathBuf,
}

impl CollectionStore {
    /// Create a store for the given file (the file need not exist yet)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the collection file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the collection
    pub fn load(&self) -> Result<RecordCollection> {
        let bytes = fs::read(&self.path).map_err(|e| {
            WifiQrError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", self.path.display(), e),
            ))
        })?;
        let collection = codec::deserialize(&bytes)
            .map_err(|e| e.with_context(format!("Failed to load {}", self.path.display())))?;
        debug!("Loaded {} network(s) from {:?}", collection.len(), self.path);
        Ok(collection)
    }

    /// Load the collection, or an empty one when the file does not exist yet
    pub fn load_or_default(&self) -> Result<RecordCollection> {
        if self.exists() {
            self.load()
        } else {
            Ok(RecordCollection::new())
        }
    }

    /// Replace the caller's collection with the file contents
    ///
    /// The collection is left untouched if reading or decoding fails.
    pub fn load_into(&self, collection: &mut RecordCollection) -> Result<()> {
        *collection = self.load()?;
        Ok(())
    }

    /// Save the collection (write to temp, then rename)
    pub fn save(&self, collection: &RecordCollection) -> Result<()> {
        let bytes = codec::serialize(collection)?;
        atomic_write(&self.path, &bytes)?;
        info!("Saved {} network(s) to {:?}", collection.len(), self.path);
        Ok(())
    }
}

/// Temp file next to `path`, hidden on unix
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "wifiqr".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write bytes to a temp file and flush it, without renaming
pub(crate) fn write_temp(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp = temp_path(path);
    let mut file = fs::File::create(&temp).map_err(|e| {
        WifiQrError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create temp file: {}", e),
        ))
    })?;
    if let Err(e) = file.write_all(bytes).and_then(|_| file.flush()) {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }
    Ok(temp)
}

/// Rename a temp file into place, removing it on failure
pub(crate) fn commit(temp: &Path, path: &Path) -> Result<()> {
    fs::rename(temp, path).map_err(|e| {
        let _ = fs::remove_file(temp);
        WifiQrError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to rename temp file: {}", e),
        ))
    })
}

/// Write a whole file atomically
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp = write_temp(path, bytes)?;
    commit(&temp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use wifiqr_core::{ImageBlob, NetworkRecord, SecurityMode};

    fn create_test_store() -> (CollectionStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = CollectionStore::new(temp_dir.path().join("wifi-networks.json"));
        (store, temp_dir)
    }

    fn sample() -> RecordCollection {
        RecordCollection::from_records(vec![
            NetworkRecord::new("HomeNet", "secret", SecurityMode::Wpa).with_location("Home"),
            NetworkRecord::open("Cafe")
                .with_center_image(ImageBlob::new("png", vec![0x89, b'P', b'N', b'G'])),
        ])
    }

    #[test]
    fn test_save_and_load() {
        let (store, _temp) = create_test_store();
        let collection = sample();

        store.save(&collection).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, collection);
    }

    #[test]
    fn test_load_nonexistent() {
        let (store, _temp) = create_test_store();
        assert!(store.load().is_err());
        assert!(store.load_or_default().unwrap().is_empty());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp() {
        let (store, _temp) = create_test_store();
        store.save(&sample()).unwrap();

        assert!(!temp_path(store.path()).exists());
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("schema_version"));
        assert!(content.contains("HomeNet"));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path().join("a").join("b").join("nets.json"));
        store.save(&sample()).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_load_into_keeps_state_on_corrupt_file() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "{ not json").unwrap();

        let mut collection = sample();
        let err = store.load_into(&mut collection).unwrap_err();
        assert_eq!(err.kind(), wifiqr_core::ErrorKind::Format);
        assert_eq!(collection, sample());
    }

    #[test]
    fn test_overwrite_replaces_whole_file() {
        let (store, _temp) = create_test_store();
        store.save(&sample()).unwrap();
        store.save(&RecordCollection::new()).unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
