//! Seams to the QR rasterizer and the page encoders
//!
//! Rasterization and image containers live outside the core crate. The core
//! decides *what* goes on a page; implementations of [`QrRenderer`] and
//! [`PageEncoder`] decide how it is drawn.

use crate::error::{Result, WifiQrError};
use crate::model::{ImageBlob, NetworkRecord};
use crate::payload;

/// QR error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    /// Survives a center image covering part of the code
    #[default]
    High,
}

/// RGB8 raster, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw RGB8 pixels; the buffer must be exactly `width * height * 3`
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(WifiQrError::Render(format!(
                "Bitmap {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A bitmap filled with one color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Color at a position, `None` outside the bitmap
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }
}

/// Turns a payload string into a QR bitmap
pub trait QrRenderer: Send + Sync {
    fn render(
        &self,
        payload: &str,
        level: ErrorCorrection,
        center_image: Option<&ImageBlob>,
    ) -> Result<Bitmap>;
}

/// Output container for a composed page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Png,
    Pdf,
}

/// A QR code with an optional header line above it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPage {
    pub header: Option<String>,
    pub qr: Bitmap,
}

/// Serializes a composed page into a container format
pub trait PageEncoder: Send + Sync {
    fn encode(&self, page: &ComposedPage, container: Container) -> Result<Vec<u8>>;
}

/// Render the QR code for a record
///
/// Preview and export both call this, so what is shown is what is exported.
pub fn render_qr(
    record: &NetworkRecord,
    renderer: &dyn QrRenderer,
    level: ErrorCorrection,
) -> Result<Bitmap> {
    let payload = payload::encode(record)?;
    renderer.render(&payload, level, record.center_image.as_ref())
}

/// Lay out a page: the trimmed location becomes the header when requested
pub fn compose_page(record: &NetworkRecord, qr: Bitmap, include_header: bool) -> ComposedPage {
    let header = Some(record.location.trim())
        .filter(|h| include_header && !h.is_empty())
        .map(str::to_string);
    ComposedPage { header, qr }
}
