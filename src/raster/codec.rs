use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageEncoder, ImageFormat};
use tracing::debug;

use crate::error::{ImageError, Result};
use crate::raster::types::{EncodedImage, PixelGrid};

/// Decode any supported raster format into a canonical RGB grid
///
/// Grayscale, alpha and 16-bit inputs are all normalized to 8-bit RGB; alpha is
/// dropped.
pub fn decode(bytes: &[u8]) -> Result<PixelGrid> {
    if bytes.is_empty() {
        return Err(ImageError::DecodeFailed {
            reason: "empty buffer".to_string(),
        }
        .into());
    }

    let format = image::guess_format(bytes).map_err(|e| ImageError::DecodeFailed {
        reason: format!("unrecognized image format: {}", e),
    })?;

    if !supported_formats().contains(&format) {
        return Err(ImageError::DecodeFailed {
            reason: format!("unsupported image format: {:?}", format),
        }
        .into());
    }

    let image = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        ImageError::DecodeFailed {
            reason: format!("{:?} payload could not be decoded: {}", format, e),
        }
    })?;

    debug!(
        "Decoded {:?} image {}x{} ({:?})",
        format,
        image.width(),
        image.height(),
        image.color()
    );

    let rgb = match image {
        DynamicImage::ImageRgb8(img) => img,
        other => other.to_rgb8(),
    };

    PixelGrid::new(rgb)
}

/// Encode a grid as lossless PNG
pub fn encode_png(grid: &PixelGrid) -> Result<EncodedImage> {
    let image = grid.as_image();
    let mut bytes = Vec::with_capacity(image.as_raw().len() / 2);

    PngEncoder::new(&mut bytes)
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)
        .map_err(|e| ImageError::EncodeFailed {
            reason: e.to_string(),
        })?;

    debug!("Encoded {}x{} grid as PNG ({} bytes)", image.width(), image.height(), bytes.len());
    Ok(EncodedImage::new(bytes))
}

/// Formats accepted by [`decode`]
pub fn supported_formats() -> &'static [ImageFormat] {
    &[
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Bmp,
        ImageFormat::WebP,
    ]
}
