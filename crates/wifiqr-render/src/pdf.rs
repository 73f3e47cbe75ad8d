//! Single-page PDF container
//!
//! The composed page raster is embedded as a Flate-compressed RGB image on a
//! US Letter page, centered horizontally below the top margin and scaled to
//! fit inside the margins.

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use wifiqr_core::error::{Result, WifiQrError};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 36.0;
const IMAGE_NAME: &str = "Im1";

fn pdf_error(e: impl std::fmt::Display) -> WifiQrError {
    WifiQrError::Render(format!("PDF encoding failed: {}", e))
}

/// Where the image lands on the page, in points: (x, y, width, height)
fn placement(width: u32, height: u32) -> (f32, f32, f32, f32) {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    let scale = ((PAGE_WIDTH - 2.0 * MARGIN) / w).min((PAGE_HEIGHT - 2.0 * MARGIN) / h);
    let (draw_w, draw_h) = (w * scale, h * scale);
    let x = (PAGE_WIDTH - draw_w) / 2.0;
    let y = PAGE_HEIGHT - MARGIN - draw_h;
    (x, y, draw_w, draw_h)
}

/// Encode a page raster as a one-page PDF document
pub(crate) fn write(image: &RgbImage) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut xobject = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
        },
        image.as_raw().clone(),
    );
    xobject.compress().map_err(pdf_error)?;
    let image_id = doc.add_object(xobject);

    let (x, y, w, h) = placement(image.width(), image.height());
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    w.into(),
                    Object::Integer(0),
                    Object::Integer(0),
                    h.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().map_err(pdf_error)?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            PAGE_WIDTH.into(),
            PAGE_HEIGHT.into(),
        ],
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_NAME => image_id,
            },
        },
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(pdf_error)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use pretty_assertions::assert_eq;

    /// Width and height of every image XObject in a PDF
    fn image_sizes(pdf: &[u8]) -> Vec<(i64, i64)> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.objects
            .values()
            .filter_map(|object| object.as_stream().ok())
            .filter(|stream| {
                stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|s| s.as_name())
                    .map(|name| name == b"Image")
                    .unwrap_or(false)
            })
            .map(|stream| {
                (
                    stream.dict.get(b"Width").unwrap().as_i64().unwrap(),
                    stream.dict.get(b"Height").unwrap().as_i64().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_page_with_image() {
        let image = RgbImage::from_pixel(8, 12, Rgb([0x11, 0x18, 0x27]));
        let pdf = write(&image).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert_eq!(image_sizes(&pdf), vec![(8, 12)]);
    }

    #[test]
    fn test_image_pixels_survive() {
        let image = RgbImage::from_pixel(4, 4, Rgb([0x11, 0x18, 0x27]));
        let pdf = write(&image).unwrap();

        let doc = Document::load_mem(&pdf).unwrap();
        let stream = doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .find(|s| s.dict.has(b"Width"))
            .unwrap();
        assert_eq!(stream.decompressed_content().unwrap(), image.as_raw().clone());
    }

    #[test]
    fn test_placement_fits_inside_margins() {
        let (x, y, w, h) = placement(640, 760);
        assert!(x >= MARGIN - 1e-3);
        assert!(y >= MARGIN - 1e-3);
        assert!((x + w) <= PAGE_WIDTH - MARGIN + 1e-3);
        assert!((y + h - (PAGE_HEIGHT - MARGIN)).abs() < 1e-3);
        assert!((w / h - 640.0 / 760.0).abs() < 1e-4);
    }
}
