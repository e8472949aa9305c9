//! PNG export format
//!
//! Encodes rasterized text with the `image` crate.

use image::{ImageBuffer, ImageEncoder, RgbaImage};

use glyphline_core::{
    error::{RasterizationError, Result},
    traits::Exporter,
    types::{BitmapData, BitmapFormat},
};

/// Encode bitmap data to PNG
///
/// The buffer must hold exactly `width * height` straight RGBA pixels.
pub fn encode_bitmap_to_png(bitmap: &BitmapData) -> Result<Vec<u8>> {
    let pixel_count = (bitmap.width as usize).saturating_mul(bitmap.height as usize);
    let expected_size = pixel_count.saturating_mul(bitmap.format.bytes_per_pixel());

    if bitmap.data.len() != expected_size {
        return Err(RasterizationError::EncodeFailed(format!(
            "buffer size mismatch: expected {} bytes for {}x{} {:?}, got {}",
            expected_size,
            bitmap.width,
            bitmap.height,
            bitmap.format,
            bitmap.data.len()
        ))
        .into());
    }

    let rgba_data = match bitmap.format {
        BitmapFormat::Rgba8 => bitmap.data.clone(),
    };

    let img: RgbaImage = ImageBuffer::from_raw(bitmap.width, bitmap.height, rgba_data)
        .ok_or_else(|| {
            RasterizationError::EncodeFailed("failed to create image buffer".into())
        })?;

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        &mut png_data,
        image::codecs::png::CompressionType::Default,
        image::codecs::png::FilterType::Sub,
    );

    encoder
        .write_image(img.as_raw(), bitmap.width, bitmap.height, image::ExtendedColorType::Rgba8)
        .map_err(|e| RasterizationError::EncodeFailed(format!("PNG encoding failed: {}", e)))?;

    log::trace!(
        "Encoded {}x{} bitmap into {} PNG bytes",
        bitmap.width,
        bitmap.height,
        png_data.len()
    );
    Ok(png_data)
}

/// PNG exporter for rendered bitmaps
///
/// ```
/// use glyphline_export::PngExporter;
/// let exporter = PngExporter::new();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        encode_bitmap_to_png(bitmap)
    }
}
