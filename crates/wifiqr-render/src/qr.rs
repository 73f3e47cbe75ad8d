//! QR rasterizer backed by the `qrcode` crate

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;
use wifiqr_core::config::{parse_hex_color, QrConfig};
use wifiqr_core::error::{Result, WifiQrError};
use wifiqr_core::export::{Bitmap, ErrorCorrection, QrRenderer};
use wifiqr_core::ImageBlob;

/// Renders payloads to square RGB bitmaps
#[derive(Debug, Clone)]
pub struct QrCodeRenderer {
    size: u32,
    border: u32,
    fill: [u8; 3],
    background: [u8; 3],
    center_image_size: u32,
}

impl Default for QrCodeRenderer {
    fn default() -> Self {
        Self {
            size: 640,
            border: 2,
            fill: [0x11, 0x18, 0x27],
            background: [0xff, 0xff, 0xff],
            center_image_size: 100,
        }
    }
}

impl QrCodeRenderer {
    pub fn from_config(config: &QrConfig) -> Result<Self> {
        Ok(Self {
            size: config.size,
            border: config.border,
            fill: parse_hex_color(&config.fill_color)?,
            background: parse_hex_color(&config.background_color)?,
            center_image_size: config.center_image_size,
        })
    }

    /// Set the edge length of rendered bitmaps
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    fn rasterize(&self, code: &QrCode) -> RgbImage {
        let modules = code.width() as u32;
        let total = modules + 2 * self.border;
        let scale = (self.size / total).max(1);
        let side = total * scale;

        let mut image = RgbImage::from_pixel(side, side, Rgb(self.background));
        for (i, color) in code.to_colors().into_iter().enumerate() {
            if color != Color::Dark {
                continue;
            }
            let x = (i as u32 % modules + self.border) * scale;
            let y = (i as u32 / modules + self.border) * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    image.put_pixel(x + dx, y + dy, Rgb(self.fill));
                }
            }
        }

        if side == self.size {
            image
        } else {
            imageops::resize(&image, self.size, self.size, FilterType::Nearest)
        }
    }

    /// Paste the center image over the middle of the code, honoring alpha
    fn overlay(&self, image: &mut RgbImage, blob: &ImageBlob) -> Result<()> {
        let center = image::load_from_memory(&blob.bytes).map_err(|e| {
            WifiQrError::Render(format!("Center image is not a valid {} image: {}", blob.format, e))
        })?;

        let edge = self.center_image_size.min(image.width()).min(image.height());
        if edge == 0 {
            return Ok(());
        }
        let center = center.resize_exact(edge, edge, FilterType::Lanczos3).to_rgba8();
        let left = (image.width() - edge) / 2;
        let top = (image.height() - edge) / 2;

        for (x, y, px) in center.enumerate_pixels() {
            let alpha = px[3] as u32;
            if alpha == 0 {
                continue;
            }
            let base = image.get_pixel_mut(left + x, top + y);
            for c in 0..3 {
                base[c] = ((px[c] as u32 * alpha + base[c] as u32 * (255 - alpha)) / 255) as u8;
            }
        }
        Ok(())
    }
}

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::Low => EcLevel::L,
        ErrorCorrection::Medium => EcLevel::M,
        ErrorCorrection::Quartile => EcLevel::Q,
        ErrorCorrection::High => EcLevel::H,
    }
}

impl QrRenderer for QrCodeRenderer {
    fn render(
        &self,
        payload: &str,
        level: ErrorCorrection,
        center_image: Option<&ImageBlob>,
    ) -> Result<Bitmap> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ec_level(level))
            .map_err(|e| WifiQrError::Render(format!("Cannot encode payload as QR: {}", e)))?;
        debug!(modules = code.width(), level = ?level, "Encoded QR symbol");

        let mut image = self.rasterize(&code);
        if let Some(blob) = center_image {
            self.overlay(&mut image, blob)?;
        }

        Bitmap::new(image.width(), image.height(), image.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use wifiqr_core::ErrorKind;

    const PAYLOAD: &str = "WIFI:T:WPA;S:HomeNet;P:secret;;";

    fn red_png() -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_render_default_size() {
        let renderer = QrCodeRenderer::default();
        let bitmap = renderer.render(PAYLOAD, ErrorCorrection::High, None).unwrap();

        assert_eq!(bitmap.width(), 640);
        assert_eq!(bitmap.height(), 640);
        // quiet zone
        assert_eq!(bitmap.pixel(0, 0), Some([0xff, 0xff, 0xff]));
        assert!(bitmap
            .pixels()
            .chunks(3)
            .any(|px| px == [0x11, 0x18, 0x27]));
    }

    #[test]
    fn test_render_from_config_colors() {
        let config = QrConfig {
            size: 200,
            border: 4,
            fill_color: "#000000".to_string(),
            background_color: "#00ff00".to_string(),
            center_image_size: 40,
        };
        let renderer = QrCodeRenderer::from_config(&config).unwrap();
        let bitmap = renderer.render(PAYLOAD, ErrorCorrection::Medium, None).unwrap();

        assert_eq!(bitmap.width(), 200);
        assert_eq!(bitmap.pixel(0, 0), Some([0, 255, 0]));
        assert!(bitmap.pixels().chunks(3).any(|px| px == [0, 0, 0]));
    }

    #[test]
    fn test_from_config_rejects_bad_color() {
        let config = QrConfig {
            fill_color: "navy".to_string(),
            ..QrConfig::default()
        };
        let err = QrCodeRenderer::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_center_image_is_pasted_in_the_middle() {
        let renderer = QrCodeRenderer::default();
        let blob = ImageBlob::new("png", red_png());
        let bitmap = renderer
            .render(PAYLOAD, ErrorCorrection::High, Some(&blob))
            .unwrap();

        let [r, g, b] = bitmap.pixel(320, 320).unwrap();
        assert!(r > 200 && g < 50 && b < 50, "center pixel was {:?}", [r, g, b]);
        // outside the 100px center area the code is untouched
        assert_eq!(bitmap.pixel(0, 0), Some([0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_invalid_center_image() {
        let renderer = QrCodeRenderer::default();
        let blob = ImageBlob::new("png", b"not an image".to_vec());
        let err = renderer
            .render(PAYLOAD, ErrorCorrection::High, Some(&blob))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
    }

    #[test]
    fn test_payload_too_long() {
        let renderer = QrCodeRenderer::default();
        let payload = "x".repeat(8000);
        let err = renderer
            .render(&payload, ErrorCorrection::High, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
    }
}
