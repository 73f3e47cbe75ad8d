//! wifiqr-storage - Storage library for wifiqr
//!
//! This crate writes network collections and export artifacts to disk. Every
//! write goes to a temp file first and is renamed into place, so readers see
//! either the old file or the complete new one.

mod artifact_writer;
mod collection_store;

pub use artifact_writer::ArtifactWriter;
pub use collection_store::CollectionStore;
