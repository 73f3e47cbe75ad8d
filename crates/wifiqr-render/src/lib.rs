//! wifiqr-render - QR rasterizer and page encoders for wifiqr
//!
//! Implements the `QrRenderer` and `PageEncoder` seams of
//! `wifiqr_core::export` so the export manager can produce PNG and PDF pages.

mod page;
mod pdf;
mod qr;

pub use page::PageWriter;
pub use qr::QrCodeRenderer;

use std::sync::Arc;
use wifiqr_core::config::Config;
use wifiqr_core::error::Result;
use wifiqr_core::export::ExportManager;

/// Build an export manager with every format, configured from `config`
pub fn export_manager(config: &Config) -> Result<ExportManager> {
    let renderer = QrCodeRenderer::from_config(&config.qr)?;
    let writer = PageWriter::from_config(&config.export)?;
    Ok(ExportManager::with_renderer(Arc::new(renderer), Arc::new(writer)))
}
