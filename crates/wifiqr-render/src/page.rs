//! PNG and PDF page encoders
//!
//! Both containers share one composition: the location header is drawn in a
//! band above the QR code, then the raster is written as a PNG or embedded in
//! a one-page PDF.

use ab_glyph::{FontArc, PxScale};
use image::{imageops, DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;
use wifiqr_core::config::ExportConfig;
use wifiqr_core::error::{Result, WifiQrError};
use wifiqr_core::export::{ComposedPage, Container, PageEncoder};

use crate::pdf;

// DejaVu Sans, see assets/fonts/LICENSE-DejaVu
const FONT_DATA: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

const DEFAULT_FONT_SIZE: f32 = 48.0;
const HEADER_PADDING: u32 = 32;
const HEADER_COLOR: Rgb<u8> = Rgb([0x0b, 0x12, 0x20]);
const PAGE_BACKGROUND: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);

fn bundled_font() -> Result<FontArc> {
    FontArc::try_from_slice(FONT_DATA)
        .map_err(|_| WifiQrError::Render("Bundled header font is unreadable".to_string()))
}

/// Encodes composed pages as PNG images or PDF documents
///
/// Headers use the bundled DejaVu Sans unless `export.header_font` names
/// another TrueType/OpenType font.
pub struct PageWriter {
    font: FontArc,
    font_size: f32,
}

impl PageWriter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            font: bundled_font()?,
            font_size: DEFAULT_FONT_SIZE,
        })
    }

    /// Writer with the export config's font override and size
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        let font = match &config.header_font {
            Some(path) => load_font(path)?,
            None => bundled_font()?,
        };
        Ok(Self {
            font,
            font_size: config.header_font_size,
        })
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = font;
        self
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// The full page raster: header band, if any, above the QR code
    pub fn compose(&self, page: &ComposedPage) -> Result<RgbImage> {
        let qr = RgbImage::from_raw(page.qr.width(), page.qr.height(), page.qr.pixels().to_vec())
            .ok_or_else(|| WifiQrError::Render("QR bitmap does not match its size".to_string()))?;

        Ok(match &page.header {
            Some(header) => self.with_header(&qr, header),
            None => qr,
        })
    }

    /// Put the header text in a band above the QR code
    fn with_header(&self, qr: &RgbImage, header: &str) -> RgbImage {
        let scale = PxScale::from(self.font_size);
        let (text_w, text_h) = text_size(scale, &self.font, header);

        let width = qr.width();
        let band = text_h + HEADER_PADDING * 2;
        let mut page = RgbImage::from_pixel(width, qr.height() + band, PAGE_BACKGROUND);
        imageops::replace(&mut page, qr, 0, band as i64);

        let x = width.saturating_sub(text_w) / 2;
        draw_text_mut(
            &mut page,
            HEADER_COLOR,
            x as i32,
            HEADER_PADDING as i32,
            scale,
            &self.font,
            header,
        );
        page
    }
}

fn encode_png(image: RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| WifiQrError::Render(format!("PNG encoding failed: {}", e)))?;
    Ok(bytes)
}

fn load_font(path: &Path) -> Result<FontArc> {
    let bytes = fs::read(path).map_err(|e| {
        WifiQrError::Config(format!("Cannot read header font {}: {}", path.display(), e))
    })?;
    FontArc::try_from_vec(bytes).map_err(|_| {
        WifiQrError::Config(format!("{} is not a TrueType/OpenType font", path.display()))
    })
}

impl PageEncoder for PageWriter {
    fn encode(&self, page: &ComposedPage, container: Container) -> Result<Vec<u8>> {
        let image = self.compose(page)?;
        let (width, height) = image.dimensions();
        let bytes = match container {
            Container::Png => encode_png(image)?,
            Container::Pdf => pdf::write(&image)?,
        };
        debug!(container = ?container, width, height, bytes = bytes.len(), "Encoded page");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use wifiqr_core::export::Bitmap;
    use wifiqr_core::ErrorKind;

    fn page(header: Option<&str>) -> ComposedPage {
        ComposedPage {
            header: header.map(str::to_string),
            qr: Bitmap::filled(64, 64, [0x11, 0x18, 0x27]),
        }
    }

    fn band_has_ink(image: &RgbImage) -> bool {
        let band = image.height() - 64;
        (0..band).any(|y| (0..image.width()).any(|x| image.get_pixel(x, y) != &PAGE_BACKGROUND))
    }

    #[test]
    fn test_png_round_trips_through_image() {
        let bytes = PageWriter::new().unwrap().encode(&page(None), Container::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (64, 64));
        assert_eq!(decoded.get_pixel(3, 3), &Rgb([0x11, 0x18, 0x27]));
    }

    #[test]
    fn test_png_header_uses_bundled_font() {
        let writer = PageWriter::from_config(&ExportConfig::default()).unwrap();
        assert_eq!(writer.font_size(), 48.0);

        let bytes = writer.encode(&page(Some("Lobby")), Container::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.width(), 64);
        assert!(decoded.height() > 64 + HEADER_PADDING * 2);
        assert!(band_has_ink(&decoded));
        // QR sits below the band, untouched
        assert_eq!(decoded.get_pixel(3, decoded.height() - 1), &Rgb([0x11, 0x18, 0x27]));
    }

    #[test]
    fn test_png_and_pdf_share_composition() {
        let writer = PageWriter::new().unwrap();
        let composed = writer.compose(&page(Some("Wi-Fi Ünterstraße"))).unwrap();

        let png = writer.encode(&page(Some("Wi-Fi Ünterstraße")), Container::Png).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded, composed);

        let pdf_bytes = writer.encode(&page(Some("Wi-Fi Ünterstraße")), Container::Pdf).unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF-"));
        let doc = lopdf::Document::load_mem(&pdf_bytes).unwrap();
        let embedded = doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .find(|s| s.dict.has(b"Width"))
            .unwrap();
        assert_eq!(
            embedded.dict.get(b"Height").unwrap().as_i64().unwrap(),
            composed.height() as i64
        );
        assert_eq!(embedded.decompressed_content().unwrap(), composed.into_raw());
    }

    #[test]
    fn test_non_latin_header_is_drawn() {
        let composed = PageWriter::new().unwrap().compose(&page(Some("Wi-Fi Москва"))).unwrap();
        assert!(composed.height() > 64);
        assert!(band_has_ink(&composed));
    }

    #[test]
    fn test_font_size_changes_band() {
        let small = PageWriter::from_config(&ExportConfig {
            header_font_size: 12.0,
            ..ExportConfig::default()
        })
        .unwrap();
        let large = PageWriter::new().unwrap();

        let small_h = small.compose(&page(Some("Lobby"))).unwrap().height();
        let large_h = large.compose(&page(Some("Lobby"))).unwrap().height();
        assert!(small_h < large_h);
    }

    #[test]
    fn test_from_config_missing_font() {
        let config = ExportConfig {
            header_font: Some("/nonexistent/font.ttf".into()),
            ..ExportConfig::default()
        };
        let err = PageWriter::from_config(&config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_from_config_rejects_non_font() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("font.ttf");
        fs::write(&path, b"definitely not a font").unwrap();

        let config = ExportConfig {
            header_font: Some(path),
            ..ExportConfig::default()
        };
        let err = PageWriter::from_config(&config).err().unwrap();
        assert!(err.to_string().contains("not a TrueType"));
    }

    #[test]
    fn test_from_config_font_override() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.ttf");
        fs::write(&path, FONT_DATA).unwrap();

        let config = ExportConfig {
            header_font: Some(path),
            ..ExportConfig::default()
        };
        let writer = PageWriter::from_config(&config).unwrap();
        assert!(writer.compose(&page(Some("Lobby"))).unwrap().height() > 64);
    }
}
