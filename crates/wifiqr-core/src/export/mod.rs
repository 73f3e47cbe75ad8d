//! Export orchestration
//!
//! Resolves an [`ExportScope`] to a snapshot of records, validates all of them
//! up front, and hands them to the exporter for the requested format:
//! - Windows connect script (one file for the whole scope)
//! - Apple configuration profile (one file for the whole scope)
//! - PNG and PDF QR pages (one file per record)
//!
//! # Example
//!
//! ```ignore
//! use wifiqr_core::export::{ExportFormat, ExportManager, ExportOptions, ExportScope};
//!
//! let manager = ExportManager::new();
//! let result = manager.export(&ExportScope::all(&collection), ExportFormat::Script, &ExportOptions::default())?;
//! ```

mod exporter;
mod render;
mod scope;

pub use exporter::{
    sanitize_filename, Artifact, ExportContext, ExportManager, ExportOptions, ExportResult, Exporter,
    ProfileExporter, QrImageExporter, ScriptExporter,
};
pub use render::{
    compose_page, render_qr, Bitmap, ComposedPage, Container, ErrorCorrection, PageEncoder, QrRenderer,
};
pub use scope::{validate_records, ExportFormat, ExportScope};
